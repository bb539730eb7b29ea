// src/commands/find/mod.rs
use async_trait::async_trait;
use regex_lite::Regex;

use crate::commands::{Command, CommandContext};
use crate::config::Limits;
use crate::fs::path::file_name;
use crate::fs::Entry;
use crate::shell::glob::{glob_to_regex, has_wildcard};
use crate::shell::ShellError;

pub struct FindCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileType {
    File,
    Directory,
}

#[derive(Debug, Default)]
struct Criteria {
    start: Option<String>,
    name: Option<Regex>,
    file_type: Option<FileType>,
}

impl Criteria {
    fn matches(&self, path: &str, entry: &Entry) -> bool {
        let type_ok = match self.file_type {
            Some(FileType::File) => entry.is_file(),
            Some(FileType::Directory) => entry.is_directory(),
            None => true,
        };
        let name_ok = self
            .name
            .as_ref()
            .map_or(true, |re| re.is_match(file_name(path)));
        type_ok && name_ok
    }
}

/// A name pattern: a glob when it has wildcards, a substring otherwise.
fn name_matcher(pattern: &str, limits: &Limits) -> Result<Regex, ShellError> {
    if pattern.len() > limits.max_pattern_length {
        return Err(ShellError::invalid(format!(
            "pattern longer than {} bytes",
            limits.max_pattern_length
        )));
    }
    let source = if has_wildcard(pattern) {
        glob_to_regex(pattern)
    } else {
        regex_lite::escape(pattern)
    };
    Regex::new(&source).map_err(|e| ShellError::invalid(format!("invalid pattern '{}': {}", pattern, e)))
}

fn parse_args(args: &[String], limits: &Limits) -> Result<Criteria, ShellError> {
    let mut criteria = Criteria::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-name" => {
                let pattern = iter
                    .next()
                    .ok_or_else(|| ShellError::invalid("missing argument to '-name'"))?;
                criteria.name = Some(name_matcher(pattern, limits)?);
            }
            "-type" => {
                criteria.file_type = match iter.next().map(String::as_str) {
                    Some("f") => Some(FileType::File),
                    Some("d") => Some(FileType::Directory),
                    Some(other) => {
                        return Err(ShellError::invalid(format!("unknown argument to -type: {}", other)))
                    }
                    None => return Err(ShellError::invalid("missing argument to '-type'")),
                };
            }
            _ if arg.starts_with('-') => {
                return Err(ShellError::invalid(format!("unknown predicate '{}'", arg)));
            }
            // first bare word is the start path, the second a name pattern
            _ if criteria.start.is_none() => criteria.start = Some(arg.clone()),
            _ if criteria.name.is_none() => criteria.name = Some(name_matcher(arg, limits)?),
            _ => return Err(ShellError::invalid(format!("unexpected argument '{}'", arg))),
        }
    }

    Ok(criteria)
}

#[async_trait]
impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn usage(&self) -> &'static str {
        "find [path] [pattern] [-name PATTERN] [-type f|d]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let criteria = parse_args(&ctx.args, ctx.limits)?;
        let start = criteria.start.clone().unwrap_or_else(|| ".".to_string());
        let root = ctx.session.vfs.resolve(&start)?;
        let prefix = start.trim_end_matches('/');

        let found: Vec<String> = ctx
            .session
            .vfs
            .walk(&start)?
            .iter()
            .filter(|(path, entry)| criteria.matches(path, entry))
            .map(|(path, _)| {
                if *path == root {
                    start.clone()
                } else if root == "/" {
                    format!("{}{}", prefix, path)
                } else {
                    format!("{}{}", prefix, &path[root.len()..])
                }
            })
            .collect();

        for path in found {
            ctx.line(&path)?;
        }
        Ok(())
    }
}

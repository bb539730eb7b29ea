// src/commands/grep/mod.rs
use async_trait::async_trait;
use regex_lite::Regex;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::config::Limits;
use crate::shell::ShellError;

pub struct GrepCommand;

struct GrepOptions {
    pattern: String,
    ignore_case: bool,
    invert_match: bool,
    count_only: bool,
    line_number: bool,
    fixed_strings: bool,
    files: Vec<String>,
}

fn parse_grep_args(args: &[String]) -> Result<GrepOptions, ShellError> {
    let flags = parse_flags(args, "ivcnF")?;
    let mut operands = flags.operands.clone().into_iter();
    let pattern = operands
        .next()
        .ok_or_else(|| ShellError::invalid("missing pattern"))?;

    Ok(GrepOptions {
        pattern,
        ignore_case: flags.has('i'),
        invert_match: flags.has('v'),
        count_only: flags.has('c'),
        line_number: flags.has('n'),
        fixed_strings: flags.has('F'),
        files: operands.collect(),
    })
}

fn build_regex(opts: &GrepOptions, limits: &Limits) -> Result<Regex, ShellError> {
    if opts.pattern.len() > limits.max_pattern_length {
        return Err(ShellError::invalid(format!(
            "pattern longer than {} bytes",
            limits.max_pattern_length
        )));
    }
    let mut pattern = if opts.fixed_strings {
        regex_lite::escape(&opts.pattern)
    } else {
        opts.pattern.clone()
    };
    if opts.ignore_case {
        pattern = format!("(?i){}", pattern);
    }
    Regex::new(&pattern).map_err(|e| ShellError::invalid(format!("invalid pattern: {}", e)))
}

/// Matching lines of `content`, numbered from 1.
fn select<'a>(content: &'a str, re: &Regex, invert: bool) -> Vec<(usize, &'a str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| re.is_match(line) != invert)
        .map(|(i, line)| (i + 1, line))
        .collect()
}

#[async_trait]
impl Command for GrepCommand {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn usage(&self) -> &'static str {
        "grep [-i -v -c -n -F] <pattern> [file...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let opts = parse_grep_args(&ctx.args)?;
        let re = build_regex(&opts, ctx.limits)?;

        let mut inputs: Vec<(Option<&str>, String)> = Vec::new();
        if opts.files.is_empty() {
            inputs.push((None, ctx.read_input(None)?));
        } else {
            for file in &opts.files {
                inputs.push((Some(file.as_str()), ctx.read_input(Some(file))?));
            }
        }
        let show_names = inputs.len() > 1;

        for (name, content) in &inputs {
            let prefix = match name {
                Some(name) if show_names => format!("{}:", name),
                _ => String::new(),
            };
            let matches = select(content, &re, opts.invert_match);

            if opts.count_only {
                ctx.line(&format!("{}{}", prefix, matches.len()))?;
                continue;
            }
            for (number, line) in matches {
                if opts.line_number {
                    ctx.line(&format!("{}{}:{}", prefix, number, line))?;
                } else {
                    ctx.line(&format!("{}{}", prefix, line))?;
                }
            }
        }
        Ok(())
    }
}

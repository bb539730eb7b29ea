// src/commands/utils/head_tail.rs
use crate::commands::CommandContext;
use crate::shell::ShellError;

#[derive(Debug, Clone)]
pub struct HeadTailOptions {
    pub lines: usize,
    pub files: Vec<String>,
}

impl Default for HeadTailOptions {
    fn default() -> Self {
        Self {
            lines: 10,
            files: Vec::new(),
        }
    }
}

fn parse_count(value: &str) -> Result<usize, ShellError> {
    value
        .parse()
        .map_err(|_| ShellError::invalid(format!("invalid number of lines: '{}'", value)))
}

/// Accepts `-n N`, `-nN`, `--lines=N` and `-N`.
pub fn parse_head_tail_args(args: &[String]) -> Result<HeadTailOptions, ShellError> {
    let mut opts = HeadTailOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "-n" {
            let value = iter
                .next()
                .ok_or_else(|| ShellError::invalid("option requires an argument -- 'n'"))?;
            opts.lines = parse_count(value)?;
        } else if let Some(value) = arg.strip_prefix("--lines=") {
            opts.lines = parse_count(value)?;
        } else if let Some(value) = arg.strip_prefix("-n") {
            opts.lines = parse_count(value)?;
        } else if arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c.is_ascii_digit()) {
            opts.lines = parse_count(&arg[1..])?;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(ShellError::invalid(format!("invalid option -- '{}'", &arg[1..])));
        } else {
            opts.files.push(arg.clone());
        }
    }

    Ok(opts)
}

pub fn get_head(content: &str, lines: usize) -> Vec<&str> {
    content.lines().take(lines).collect()
}

pub fn get_tail(content: &str, lines: usize) -> Vec<&str> {
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].to_vec()
}

/// Apply `select` to piped input or to each file, printing a header per file
/// when there is more than one.
pub fn run_head_tail<F>(
    ctx: &mut CommandContext<'_>,
    opts: &HeadTailOptions,
    select: F,
) -> Result<(), ShellError>
where
    F: Fn(&str, usize) -> Vec<&str>,
{
    if opts.files.is_empty() {
        let content = ctx.read_input(None)?;
        for line in select(&content, opts.lines) {
            ctx.line(line)?;
        }
        return Ok(());
    }

    let show_headers = opts.files.len() > 1;
    for (i, file) in opts.files.iter().enumerate() {
        let content = ctx.read_input(Some(file))?;
        if show_headers {
            if i > 0 {
                ctx.line("")?;
            }
            ctx.line(&format!("==> {} <==", file))?;
        }
        for line in select(&content, opts.lines) {
            ctx.line(line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_head_tail_args(&args(&["-n", "3"])).unwrap().lines, 3);
        assert_eq!(parse_head_tail_args(&args(&["-n4", "f"])).unwrap().lines, 4);
        assert_eq!(parse_head_tail_args(&args(&["-7"])).unwrap().lines, 7);
        assert_eq!(parse_head_tail_args(&args(&["--lines=2"])).unwrap().lines, 2);
        assert_eq!(parse_head_tail_args(&args(&["f"])).unwrap().files, vec!["f"]);
        assert!(parse_head_tail_args(&args(&["-n", "x"])).is_err());
        assert!(parse_head_tail_args(&args(&["-n"])).is_err());
        assert!(parse_head_tail_args(&args(&["-q"])).is_err());
    }

    #[test]
    fn test_select() {
        let text = "1\n2\n3\n4\n";
        assert_eq!(get_head(text, 2), vec!["1", "2"]);
        assert_eq!(get_tail(text, 2), vec!["3", "4"]);
        assert_eq!(get_tail(text, 10).len(), 4);
        assert!(get_head(text, 0).is_empty());
    }
}

// src/commands/utils/flags.rs
use std::collections::HashSet;

use crate::shell::ShellError;

/// Short flags found in an argument list, plus the remaining operands.
#[derive(Debug, Default)]
pub struct Flags {
    set: HashSet<char>,
    pub operands: Vec<String>,
}

impl Flags {
    pub fn has(&self, flag: char) -> bool {
        self.set.contains(&flag)
    }
}

/// Split `args` into single-letter flags from `allowed` and operands.
///
/// Flags may be bundled (`-la`). `--` ends flag parsing and a lone `-` is an
/// operand.
pub fn parse_flags(args: &[String], allowed: &str) -> Result<Flags, ShellError> {
    let mut flags = Flags::default();
    let mut only_operands = false;

    for arg in args {
        if only_operands || arg == "-" || !arg.starts_with('-') {
            flags.operands.push(arg.clone());
            continue;
        }
        if arg == "--" {
            only_operands = true;
            continue;
        }
        for c in arg[1..].chars() {
            if !allowed.contains(c) {
                return Err(ShellError::invalid(format!("invalid option -- '{}'", c)));
            }
            flags.set.insert(c);
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bundled_flags() {
        let flags = parse_flags(&args(&["-la", "/tmp", "-h"]), "lahd").unwrap();
        assert!(flags.has('l') && flags.has('a') && flags.has('h'));
        assert!(!flags.has('d'));
        assert_eq!(flags.operands, vec!["/tmp"]);
    }

    #[test]
    fn test_double_dash_and_unknown() {
        let flags = parse_flags(&args(&["--", "-r", "-"]), "r").unwrap();
        assert!(!flags.has('r'));
        assert_eq!(flags.operands, vec!["-r", "-"]);

        let err = parse_flags(&args(&["-x"]), "r").unwrap_err();
        assert_eq!(err.to_string(), "invalid option -- 'x'");
    }
}

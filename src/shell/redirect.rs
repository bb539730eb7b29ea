//! Redirection
//!
//! Detected on the raw line before tokenizing, in fixed priority:
//! append (`>>`), then stderr (`2>`), then overwrite (`>`).

use super::error::ShellError;
use super::tokenizer::{find_unquoted, tokenize};
use crate::config::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Overwrite,
    Append,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub target: String,
    /// The target was quoted, so `~` stays literal.
    pub quoted: bool,
}

/// Find the `2>` operator: a `2` that starts a word.
fn find_stderr(line: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = find_unquoted(&line[from..], "2>") {
        let idx = from + rel;
        let starts_word = line[..idx]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if starts_word {
            return Some(idx);
        }
        from = idx + 2;
    }
    None
}

/// Split `line` into the command part and an optional redirect.
pub fn split_redirect<'a>(
    line: &'a str,
    limits: &Limits,
) -> Result<(&'a str, Option<Redirect>), ShellError> {
    let found = if let Some(idx) = find_unquoted(line, ">>") {
        Some((idx, 2, RedirectKind::Append))
    } else if let Some(idx) = find_stderr(line) {
        Some((idx, 2, RedirectKind::Stderr))
    } else {
        find_unquoted(line, ">").map(|idx| (idx, 1, RedirectKind::Overwrite))
    };

    let Some((idx, width, kind)) = found else {
        return Ok((line, None));
    };

    let command = &line[..idx];
    let mut words = tokenize(&line[idx + width..], limits)?;
    let word = match words.len() {
        0 => return Err(ShellError::parse("missing redirection target")),
        1 => words.remove(0),
        _ => return Err(ShellError::parse("ambiguous redirect")),
    };
    let (target, quoted) = (word.text, word.quoted);
    if target.is_empty() {
        return Err(ShellError::parse("missing redirection target"));
    }
    if target.len() > limits.max_path_length {
        return Err(ShellError::parse(format!(
            "redirection target longer than {} bytes",
            limits.max_path_length
        )));
    }
    if command.trim().is_empty() {
        return Err(ShellError::parse("missing command before redirection"));
    }

    Ok((command, Some(Redirect { kind, target, quoted })))
}

//! Wildcard Expansion
//!
//! Unquoted words containing `*`, `?` or a bracket class are matched against
//! the names in the current directory only. A pattern with no match stays a
//! single literal word.

use regex_lite::Regex;

use super::error::ShellError;
use super::tokenizer::Token;
use crate::config::Limits;
use crate::fs::Vfs;

pub fn has_wildcard(word: &str) -> bool {
    word.contains(['*', '?', '['])
}

fn is_regex_special(c: char) -> bool {
    "\\^$.|+(){}[]*?".contains(c)
}

/// Index of the `]` closing the class opened at `start`, if any.
fn find_bracket_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if i < chars.len() && (chars[i] == '!' || chars[i] == '^') {
        i += 1;
    }
    // a leading ']' is literal
    if i < chars.len() && chars[i] == ']' {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Translate a glob into an anchored regular expression.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '[' => match find_bracket_end(&chars, i) {
                Some(end) => {
                    regex.push('[');
                    let mut j = i + 1;
                    if chars[j] == '!' || chars[j] == '^' {
                        regex.push('^');
                        j += 1;
                    }
                    for &cc in &chars[j..end] {
                        if cc == '\\' || cc == '[' || cc == ']' || cc == '^' {
                            regex.push('\\');
                        }
                        regex.push(cc);
                    }
                    regex.push(']');
                    i = end;
                }
                None => regex.push_str("\\["),
            },
            _ => {
                if is_regex_special(c) {
                    regex.push('\\');
                }
                regex.push(c);
            }
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Expand one word against the current directory's children.
pub fn expand(token: &Token, vfs: &Vfs, limits: &Limits) -> Result<Vec<String>, ShellError> {
    let word = &token.text;
    if token.quoted || !has_wildcard(word) || word.contains('/') {
        return Ok(vec![word.clone()]);
    }
    if word.len() > limits.max_pattern_length {
        return Err(ShellError::parse(format!(
            "pattern longer than {} bytes",
            limits.max_pattern_length
        )));
    }
    let Ok(re) = Regex::new(&glob_to_regex(word)) else {
        return Ok(vec![word.clone()]);
    };

    let show_hidden = word.starts_with('.');
    let matches: Vec<String> = vfs
        .list_directory(vfs.cwd())
        .map(|children| {
            children
                .into_iter()
                .map(|child| child.name)
                .filter(|name| show_hidden || !name.starts_with('.'))
                .filter(|name| re.is_match(name))
                .collect()
        })
        .unwrap_or_default();

    if matches.is_empty() {
        Ok(vec![word.clone()])
    } else {
        Ok(matches)
    }
}

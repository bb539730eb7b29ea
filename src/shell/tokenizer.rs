//! Tokenizer
//!
//! Splits a command line on whitespace outside quotes. Single and double
//! quotes behave the same way: they group text and are stripped from the
//! token. There are no escapes.

use super::error::ShellError;
use crate::config::Limits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Some part of the token was quoted, so it is never globbed or
    /// alias-expanded.
    pub quoted: bool,
}

impl Token {
    pub fn bare(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quoted: false,
        }
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Reject input longer than `max_command_length`.
pub fn check_length(input: &str, limits: &Limits) -> Result<(), ShellError> {
    if input.len() > limits.max_command_length {
        return Err(ShellError::parse(format!(
            "command line too long ({} bytes, limit {})",
            input.len(),
            limits.max_command_length
        )));
    }
    Ok(())
}

pub fn tokenize(input: &str, limits: &Limits) -> Result<Vec<Token>, ShellError> {
    check_length(input, limits)?;

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_token = false;
    let mut open_quote: Option<char> = None;

    for c in input.chars() {
        match open_quote {
            Some(q) if c == q => open_quote = None,
            Some(_) => current.push(c),
            None if is_quote(c) => {
                open_quote = Some(c);
                quoted = true;
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    quoted = false;
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = open_quote {
        return Err(ShellError::parse(format!("unterminated quote ({})", q)));
    }
    if in_token {
        tokens.push(Token {
            text: current,
            quoted,
        });
    }
    if tokens.len() > limits.max_args {
        return Err(ShellError::parse(format!(
            "too many arguments ({}, limit {})",
            tokens.len(),
            limits.max_args
        )));
    }
    Ok(tokens)
}

/// Byte offset of the first occurrence of `pat` outside quotes.
pub fn find_unquoted(input: &str, pat: &str) -> Option<usize> {
    let mut open_quote: Option<char> = None;
    for (idx, c) in input.char_indices() {
        match open_quote {
            Some(q) if c == q => open_quote = None,
            Some(_) => {}
            None if is_quote(c) => open_quote = Some(c),
            None if input[idx..].starts_with(pat) => return Some(idx),
            None => {}
        }
    }
    None
}

/// Split on every `sep` outside quotes.
pub fn split_unquoted(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut open_quote: Option<char> = None;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        match open_quote {
            Some(q) if c == q => open_quote = None,
            Some(_) => {}
            None if is_quote(c) => open_quote = Some(c),
            None if c == sep => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input, &Limits::default())
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(texts("  ls   -l  /tmp "), vec!["ls", "-l", "/tmp"]);
        assert!(texts("   ").is_empty());
    }

    #[test]
    fn test_quotes_are_stripped_and_equivalent() {
        assert_eq!(texts("echo 'a b' \"c d\""), vec!["echo", "a b", "c d"]);
        assert_eq!(texts("echo \"it's\" 'say \"hi\"'"), vec!["echo", "it's", "say \"hi\""]);
        assert_eq!(texts("echo pre'mid'post"), vec!["echo", "premidpost"]);
        assert_eq!(texts("echo ''"), vec!["echo", ""]);
    }

    #[test]
    fn test_quoted_flag() {
        let tokens = tokenize("ls '*.txt' *.md", &Limits::default()).unwrap();
        assert!(!tokens[0].quoted);
        assert!(tokens[1].quoted);
        assert!(!tokens[2].quoted);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("echo 'oops", &Limits::default()).unwrap_err();
        assert!(matches!(err, ShellError::Parse(msg) if msg.contains("unterminated")));
    }

    #[test]
    fn test_limits() {
        let limits = Limits {
            max_command_length: 10,
            max_args: 3,
            ..Default::default()
        };
        assert!(tokenize("echo 12345678", &limits).is_err());
        assert!(tokenize("a b c d", &limits).is_err());
        assert_eq!(tokenize("a b c", &limits).unwrap().len(), 3);
    }

    #[test]
    fn test_split_and_find_respect_quotes() {
        assert_eq!(split_unquoted("a | 'b|c' | d", '|'), vec!["a ", " 'b|c' ", " d"]);
        assert_eq!(find_unquoted("echo '>' > f", ">"), Some(9));
        assert_eq!(find_unquoted("echo \">>\"", ">>"), None);
    }
}

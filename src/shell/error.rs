//! Shell Errors
//!
//! Handlers fail with a [`ShellError`]; the dispatch layer pairs it with the
//! command name so that every reported error reads `<command>: <message>`.

use std::fmt;

use thiserror::Error;

use crate::fs::FsError;
use crate::network::NetworkError;

#[derive(Error, Debug, Clone)]
pub enum ShellError {
    #[error("command not found")]
    CommandNotFound,

    #[error("{0}")]
    Parse(String),

    #[error("output exceeds the {limit} byte capture limit")]
    CapacityExceeded { limit: usize },

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("{0}")]
    Failed(String),
}

impl ShellError {
    pub fn parse(msg: impl Into<String>) -> Self {
        ShellError::Parse(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ShellError::InvalidArgument(msg.into())
    }
}

/// A failed command line, attributed to the command that failed.
#[derive(Debug, Clone)]
pub struct CommandFailure {
    pub command: String,
    pub error: ShellError,
}

impl CommandFailure {
    pub fn new(command: impl Into<String>, error: ShellError) -> Self {
        Self {
            command: command.into(),
            error,
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.command, self.error)
    }
}

impl std::error::Error for CommandFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let f = CommandFailure::new("frob", ShellError::CommandNotFound);
        assert_eq!(f.to_string(), "frob: command not found");

        let f = CommandFailure::new(
            "cat",
            FsError::NotFound { path: "/x".to_string() }.into(),
        );
        assert_eq!(f.to_string(), "cat: /x: No such file or directory");
    }
}

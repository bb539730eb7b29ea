// src/commands/types.rs
use async_trait::async_trait;

use super::registry::CommandRegistry;
use crate::config::Limits;
use crate::shell::{Output, Session, ShellError};

/// Everything a built-in may touch while it runs.
pub struct CommandContext<'a> {
    pub args: Vec<String>,
    /// Output of the previous pipeline stage, if any.
    pub stdin: Option<String>,
    pub session: &'a mut Session,
    pub out: &'a mut Output,
    pub registry: &'a CommandRegistry,
    pub limits: &'a Limits,
}

impl CommandContext<'_> {
    /// Emit one line of normal output.
    pub fn line(&mut self, line: &str) -> Result<(), ShellError> {
        self.out.line(line)
    }

    /// Bring `PWD` and the prompt in line after an operation that may have
    /// moved the working directory (a move or removal of an ancestor).
    pub fn sync_cwd(&mut self) {
        let cwd = self.session.vfs.cwd().to_string();
        if self.session.env.get("PWD") == Some(cwd.as_str()) {
            return;
        }
        self.session.env.set("PWD", &cwd);
        let prompt = self.session.prompt();
        self.out.prompt_changed(&prompt);
    }

    /// Content of `file`, or the piped input when no file is given.
    pub fn read_input(&self, file: Option<&str>) -> Result<String, ShellError> {
        match file {
            Some(path) => Ok(self.session.vfs.read_file(path)?),
            None => self
                .stdin
                .clone()
                .ok_or_else(|| ShellError::invalid("missing file operand")),
        }
    }
}

/// A built-in command. Output goes through the context; failures are
/// returned and reported by the dispatcher as `<name>: <message>`.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-line synopsis shown by `help`.
    fn usage(&self) -> &'static str;

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError>;
}

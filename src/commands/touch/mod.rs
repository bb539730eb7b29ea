// src/commands/touch/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct TouchCommand;

#[async_trait]
impl Command for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn usage(&self) -> &'static str {
        "touch <file...>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::invalid("missing file operand"));
        }
        for file in &ctx.args {
            ctx.session.vfs.touch(file)?;
        }
        Ok(())
    }
}

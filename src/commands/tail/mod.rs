// src/commands/tail/mod.rs
use async_trait::async_trait;

use crate::commands::utils::{get_tail, parse_head_tail_args, run_head_tail};
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct TailCommand;

#[async_trait]
impl Command for TailCommand {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn usage(&self) -> &'static str {
        "tail [-n N] [file...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let opts = parse_head_tail_args(&ctx.args)?;
        run_head_tail(ctx, &opts, get_tail)
    }
}

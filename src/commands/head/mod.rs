// src/commands/head/mod.rs
use async_trait::async_trait;

use crate::commands::utils::{get_head, parse_head_tail_args, run_head_tail};
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct HeadCommand;

#[async_trait]
impl Command for HeadCommand {
    fn name(&self) -> &'static str {
        "head"
    }

    fn usage(&self) -> &'static str {
        "head [-n N] [file...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let opts = parse_head_tail_args(&ctx.args)?;
        run_head_tail(ctx, &opts, get_head)
    }
}

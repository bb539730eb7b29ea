use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if let Some(name) = ctx.args.first() {
            let cmd = ctx
                .registry
                .get(name)
                .ok_or_else(|| ShellError::invalid(format!("no help topics match '{}'", name)))?;
            let line = format!("usage: {}", cmd.usage());
            return ctx.line(&line);
        }

        let registry = ctx.registry;
        let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
        ctx.line("Available commands:")?;
        for cmd in registry.iter() {
            ctx.line(&format!("  {:<width$}  {}", cmd.name(), cmd.usage(), width = width))?;
        }
        ctx.line("Use '<command> --help' for details on a specific command.")
    }
}

use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct AliasCommand;

#[async_trait]
impl Command for AliasCommand {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn usage(&self) -> &'static str {
        "alias [name[=value] ...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            let listing: Vec<String> = ctx
                .session
                .aliases
                .iter()
                .map(|(name, value)| format!("alias {}='{}'", name, value))
                .collect();
            for line in listing {
                ctx.line(&line)?;
            }
            return Ok(());
        }

        let args = ctx.args.clone();
        for arg in &args {
            match arg.split_once('=') {
                Some((name, value)) => {
                    let session = &mut *ctx.session;
                    session.aliases.set(&mut session.vfs, name, value)?;
                }
                None => {
                    let value = ctx
                        .session
                        .aliases
                        .get(arg)
                        .map(str::to_string)
                        .ok_or_else(|| ShellError::invalid(format!("{}: not found", arg)))?;
                    ctx.line(&format!("alias {}='{}'", arg, value))?;
                }
            }
        }
        Ok(())
    }
}

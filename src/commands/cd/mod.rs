// src/commands/cd/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct CdCommand;

#[async_trait]
impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn usage(&self) -> &'static str {
        "cd [dir | - | ~]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.len() > 1 {
            return Err(ShellError::invalid("too many arguments"));
        }

        let previous = ctx.session.vfs.cwd().to_string();
        let home = ctx.session.vfs.home().to_string();
        let (target, announce) = match ctx.args.first().map(String::as_str) {
            None | Some("~") => (home, false),
            Some("-") => {
                let old = ctx
                    .session
                    .env
                    .get("OLDPWD")
                    .ok_or_else(|| ShellError::invalid("OLDPWD not set"))?;
                (old.to_string(), true)
            }
            Some(dir) => (dir.to_string(), false),
        };

        let cwd = ctx.session.vfs.change_directory(&target)?;
        ctx.session.env.set("OLDPWD", &previous);
        ctx.session.env.set("PWD", &cwd);
        if announce {
            ctx.line(&cwd)?;
        }
        let prompt = ctx.session.prompt();
        ctx.out.prompt_changed(&prompt);
        Ok(())
    }
}

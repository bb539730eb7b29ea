use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct UnaliasCommand;

#[async_trait]
impl Command for UnaliasCommand {
    fn name(&self) -> &'static str {
        "unalias"
    }

    fn usage(&self) -> &'static str {
        "unalias [-a] <name...>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::invalid("usage: unalias [-a] name [name ...]"));
        }

        let names: Vec<String> = if ctx.args.iter().any(|a| a == "-a") {
            ctx.session.aliases.iter().map(|(name, _)| name.to_string()).collect()
        } else {
            ctx.args.clone()
        };

        let session = &mut *ctx.session;
        for name in &names {
            if !session.aliases.remove(&mut session.vfs, name)? {
                return Err(ShellError::invalid(format!("{}: not found", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::test_support::shell;

    #[tokio::test]
    async fn test_unalias() {
        let (mut sh, t) = shell();
        sh.execute("alias a='echo a' b='echo b' c='echo c'").await.unwrap();
        sh.execute("unalias a").await.unwrap();
        assert!(sh.session().aliases.get("a").is_none());
        sh.execute("unalias a").await.unwrap_err();
        assert_eq!(t.stderr(), "unalias: a: not found\n");
        sh.execute("unalias -a").await.unwrap();
        assert!(sh.session().aliases.is_empty());
    }
}

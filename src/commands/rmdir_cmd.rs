use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct RmdirCommand;

#[async_trait]
impl Command for RmdirCommand {
    fn name(&self) -> &'static str {
        "rmdir"
    }

    fn usage(&self) -> &'static str {
        "rmdir <dir...>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::invalid("missing operand"));
        }
        for dir in &ctx.args {
            ctx.session.vfs.remove_directory(dir, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fs::FsError;
    use crate::shell::test_support::shell;
    use crate::shell::ShellError;

    #[tokio::test]
    async fn test_rmdir_empty_only() {
        let (mut sh, t) = shell();
        sh.execute("mkdir -p /tmp/d/inner").await.unwrap();
        let err = sh.execute("rmdir /tmp/d").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::NotEmpty { .. })));
        assert_eq!(t.stderr(), "rmdir: /tmp/d: Directory not empty\n");

        sh.execute("rmdir /tmp/d/inner").await.unwrap();
        sh.execute("rmdir /tmp/d").await.unwrap();
        assert!(!sh.session().vfs.exists("/tmp/d"));
    }

    #[tokio::test]
    async fn test_rmdir_file() {
        let (mut sh, _) = shell();
        let err = sh.execute("rmdir /etc/motd").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::NotADirectory { .. })));
    }
}

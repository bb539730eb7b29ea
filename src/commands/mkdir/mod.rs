// src/commands/mkdir/mod.rs
use async_trait::async_trait;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct MkdirCommand;

#[async_trait]
impl Command for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn usage(&self) -> &'static str {
        "mkdir [-p] <dir...>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "p")?;
        if flags.operands.is_empty() {
            return Err(ShellError::invalid("missing operand"));
        }
        for dir in &flags.operands {
            ctx.session.vfs.create_directory(dir, flags.has('p'))?;
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
    async fn test_mkdir_parents() {
        let (mut sh, _) = shell();
        sh.execute("mkdir -p /a/b/c").await.unwrap();
        for dir in ["/a", "/a/b", "/a/b/c"] {
            assert!(sh.session().vfs.is_directory(dir), "{} missing", dir);
        }
        // -p tolerates an existing directory
        sh.execute("mkdir -p /a/b").await.unwrap();
    }

    #[tokio::test]
    async fn test_mkdir_without_parents_fails() {
        let (mut sh, t) = shell();
        let err = sh.execute("mkdir /x/y").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::NotFound { .. })));
        assert!(!sh.session().vfs.exists("/x"));
        sh.execute("mkdir").await.unwrap_err();
        assert!(t.stderr().ends_with("mkdir: missing operand\n"));
    }

    #[tokio::test]
    async fn test_mkdir_over_file() {
        let (mut sh, _) = shell();
        let err = sh.execute("mkdir /etc/motd").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_mkdir_relative_and_many() {
        let (mut sh, _) = shell();
        sh.execute("mkdir one two").await.unwrap();
        assert!(sh.session().vfs.is_directory("/home/guest/one"));
        assert!(sh.session().vfs.is_directory("/home/guest/two"));
    }
}

// src/commands/mv/mod.rs
use async_trait::async_trait;

use crate::commands::cp::sources_and_dest;
use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct MvCommand;

#[async_trait]
impl Command for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn usage(&self) -> &'static str {
        "mv [-v] <src...> <dst>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "v")?;
        let (sources, dest) = sources_and_dest(ctx, &flags.operands)?;

        for src in sources {
            let moved = ctx.session.vfs.move_file(src, dest)?;
            if flags.has('v') {
                ctx.line(&format!("renamed '{}' -> '{}'", src, moved))?;
            }
        }
        ctx.sync_cwd();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fs::FsError;
    use crate::shell::test_support::shell;
    use crate::shell::ShellError;

    #[tokio::test]
    async fn test_mv_renames() {
        let (mut sh, t) = shell();
        sh.execute("echo x > /tmp/old").await.unwrap();
        sh.execute("mv -v /tmp/old /tmp/new").await.unwrap();
        assert!(!sh.session().vfs.exists("/tmp/old"));
        assert_eq!(sh.session().vfs.read_file("/tmp/new").unwrap(), "x\n");
        assert_eq!(t.stdout(), "renamed '/tmp/old' -> '/tmp/new'\n");
    }

    #[tokio::test]
    async fn test_mv_directory_tree() {
        let (mut sh, _) = shell();
        sh.execute("mkdir -p /tmp/proj/src").await.unwrap();
        sh.execute("echo fn > /tmp/proj/src/main.rs").await.unwrap();
        sh.execute("mkdir /srv").await.unwrap();
        sh.execute("mv /tmp/proj /srv").await.unwrap();
        assert_eq!(sh.session().vfs.read_file("/srv/proj/src/main.rs").unwrap(), "fn\n");
        assert!(!sh.session().vfs.exists("/tmp/proj"));
    }

    #[tokio::test]
    async fn test_mv_follows_cwd() {
        let (mut sh, t) = shell();
        sh.execute("mkdir -p /tmp/here").await.unwrap();
        sh.execute("cd /tmp/here").await.unwrap();
        sh.execute("mv /tmp/here /tmp/there").await.unwrap();
        assert_eq!(sh.session().vfs.cwd(), "/tmp/there");
        assert_eq!(sh.session().env.get("PWD"), Some("/tmp/there"));
        assert_eq!(t.prompts().last().map(String::as_str), Some("guest@portfolio:/tmp/there$ "));
    }

    #[tokio::test]
    async fn test_mv_missing_source() {
        let (mut sh, _) = shell();
        let err = sh.execute("mv /nope /tmp/x").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::NotFound { .. })));
    }
}

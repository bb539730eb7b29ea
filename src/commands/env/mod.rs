// src/commands/env/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::env::is_valid_name;
use crate::shell::ShellError;

pub struct EnvCommand;

#[async_trait]
impl Command for EnvCommand {
    fn name(&self) -> &'static str {
        "env"
    }

    fn usage(&self) -> &'static str {
        "env"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if let Some(arg) = ctx.args.first() {
            return Err(ShellError::invalid(format!("unexpected argument '{}'", arg)));
        }
        let vars: Vec<String> = ctx
            .session
            .env
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        for var in vars {
            ctx.line(&var)?;
        }
        Ok(())
    }
}

pub struct ExportCommand;

#[async_trait]
impl Command for ExportCommand {
    fn name(&self) -> &'static str {
        "export"
    }

    fn usage(&self) -> &'static str {
        "export NAME=value..."
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            let vars: Vec<String> = ctx
                .session
                .env
                .iter()
                .map(|(name, value)| format!("export {}=\"{}\"", name, value))
                .collect();
            for var in vars {
                ctx.line(&var)?;
            }
            return Ok(());
        }

        for arg in &ctx.args {
            let (name, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
            if !is_valid_name(name) || name.contains(['-', '.']) {
                return Err(ShellError::invalid(format!("'{}': not a valid identifier", arg)));
            }
            ctx.session.env.set(name, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::test_support::shell;

    #[tokio::test]
    async fn test_export_and_env() {
        let (mut sh, t) = shell();
        sh.execute("export EDITOR=vi GREETING='hello there'").await.unwrap();
        sh.execute("echo $GREETING").await.unwrap();
        sh.execute("env | grep EDITOR").await.unwrap();
        assert_eq!(t.stdout(), "hello there\nEDITOR=vi\n");
    }

    #[tokio::test]
    async fn test_env_lists_session_vars() {
        let (mut sh, t) = shell();
        sh.execute("env").await.unwrap();
        let out = t.stdout();
        assert!(out.starts_with("USER=guest\n"));
        assert!(out.contains("HOME=/home/guest\n"));
        assert!(out.contains("PWD=/home/guest\n"));
    }

    #[tokio::test]
    async fn test_export_invalid_name() {
        let (mut sh, t) = shell();
        sh.execute("export 1x-y=2").await.unwrap_err();
        assert_eq!(t.stderr(), "export: '1x-y=2': not a valid identifier\n");
    }
}

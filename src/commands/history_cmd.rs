use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn usage(&self) -> &'static str {
        "history [-c] [n]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let mut count: Option<usize> = None;
        for arg in ctx.args.clone() {
            match arg.as_str() {
                "-c" => {
                    let session = &mut *ctx.session;
                    session.history.clear(&mut session.vfs);
                    return Ok(());
                }
                n => {
                    count = Some(
                        n.parse()
                            .map_err(|_| ShellError::invalid(format!("{}: numeric argument required", n)))?,
                    );
                }
            }
        }

        let entries = ctx.session.history.entries();
        let start = entries.len().saturating_sub(count.unwrap_or(entries.len()));
        let lines: Vec<String> = entries[start..]
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:>5}  {}", start + i + 1, entry))
            .collect();
        for line in lines {
            ctx.line(&line)?;
        }
        Ok(())
    }
}

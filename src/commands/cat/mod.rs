// src/commands/cat/mod.rs
use async_trait::async_trait;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct CatCommand;

#[async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn usage(&self) -> &'static str {
        "cat [-n] [file...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "n")?;
        let show_line_numbers = flags.has('n');

        // no operands: read the piped input
        let mut sources: Vec<Option<&str>> = flags.operands.iter().map(|f| Some(f.as_str())).collect();
        if sources.is_empty() {
            sources.push(None);
        }

        // read everything first so a missing file prints nothing
        let mut contents = Vec::with_capacity(sources.len());
        for source in sources {
            contents.push(ctx.read_input(source)?);
        }

        let mut line_number = 1;
        for content in &contents {
            if show_line_numbers {
                for line in content.lines() {
                    ctx.line(&format!("{:>6}\t{}", line_number, line))?;
                    line_number += 1;
                }
            } else {
                ctx.out.text(content)?;
            }
        }
        Ok(())
    }
}

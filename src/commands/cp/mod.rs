// src/commands/cp/mod.rs
use async_trait::async_trait;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::fs::FsError;
use crate::shell::ShellError;

pub struct CpCommand;

/// Split operands into sources and a destination, which must be a directory
/// when there is more than one source.
pub(crate) fn sources_and_dest<'a>(
    ctx: &CommandContext<'_>,
    operands: &'a [String],
) -> Result<(&'a [String], &'a str), ShellError> {
    let Some((dest, sources)) = operands.split_last() else {
        return Err(ShellError::invalid("missing file operand"));
    };
    if sources.is_empty() {
        return Err(ShellError::invalid(format!(
            "missing destination file operand after '{}'",
            dest
        )));
    }
    if sources.len() > 1 && !ctx.session.vfs.is_directory(dest) {
        return Err(FsError::NotADirectory {
            path: ctx.session.vfs.resolve(dest)?,
        }
        .into());
    }
    Ok((sources, dest))
}

#[async_trait]
impl Command for CpCommand {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn usage(&self) -> &'static str {
        "cp [-v] <src...> <dst>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "v")?;
        let (sources, dest) = sources_and_dest(ctx, &flags.operands)?;

        for src in sources {
            let copied = ctx.session.vfs.copy_file(src, dest)?;
            if flags.has('v') {
                ctx.line(&format!("'{}' -> '{}'", src, copied))?;
            }
        }
        Ok(())
    }
}

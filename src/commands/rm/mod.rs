// src/commands/rm/mod.rs
use std::collections::HashSet;

use async_trait::async_trait;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::fs::path::is_descendant;
use crate::fs::FsError;
use crate::shell::ShellError;

pub struct RmCommand;

#[async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn usage(&self) -> &'static str {
        "rm [-r -f] <path...>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "rRf")?;
        let recursive = flags.has('r') || flags.has('R');
        let force = flags.has('f');

        if flags.operands.is_empty() {
            if force {
                return Ok(());
            }
            return Err(ShellError::invalid("missing operand"));
        }

        // check every operand before removing anything
        let mut targets = Vec::with_capacity(flags.operands.len());
        for path in &flags.operands {
            let entry = match ctx.session.vfs.stat(path) {
                Ok(entry) => entry,
                Err(FsError::NotFound { .. }) if force => continue,
                Err(e) => return Err(e.into()),
            };
            if entry.is_directory() && !recursive {
                return Err(FsError::NotAFile {
                    path: ctx.session.vfs.resolve(path)?,
                }
                .into());
            }
            targets.push((ctx.session.vfs.resolve(path)?, entry.is_directory()));
        }

        // drop repeats and paths inside a directory being removed
        let dirs: Vec<String> = targets
            .iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(path, _)| path.clone())
            .collect();
        let mut seen = HashSet::new();
        targets.retain(|(path, _)| {
            seen.insert(path.clone()) && !dirs.iter().any(|dir| is_descendant(path, dir))
        });

        for (path, is_dir) in &targets {
            if *is_dir {
                ctx.session.vfs.remove_directory(path, true)?;
            } else {
                ctx.session.vfs.delete_file(path)?;
            }
        }
        ctx.sync_cwd();
        Ok(())
    }
}

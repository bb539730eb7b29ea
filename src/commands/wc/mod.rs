// src/commands/wc/mod.rs
use async_trait::async_trait;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct WcCommand;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Counts {
    fn of(content: &str) -> Self {
        Self {
            lines: content.matches('\n').count(),
            words: content.split_whitespace().count(),
            bytes: content.len(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

struct Columns {
    lines: bool,
    words: bool,
    bytes: bool,
}

impl Columns {
    fn render(&self, counts: Counts, name: Option<&str>) -> String {
        let mut fields = Vec::new();
        if self.lines {
            fields.push(counts.lines);
        }
        if self.words {
            fields.push(counts.words);
        }
        if self.bytes {
            fields.push(counts.bytes);
        }

        // a single column on piped input prints the bare number
        let mut out = if fields.len() == 1 && name.is_none() {
            fields[0].to_string()
        } else {
            fields.iter().map(|n| format!("{:>7}", n)).collect::<String>()
        };
        if let Some(name) = name {
            out.push(' ');
            out.push_str(name);
        }
        out
    }
}

#[async_trait]
impl Command for WcCommand {
    fn name(&self) -> &'static str {
        "wc"
    }

    fn usage(&self) -> &'static str {
        "wc [-l -w -c] [file...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "lwc")?;
        let any = flags.has('l') || flags.has('w') || flags.has('c');
        let columns = Columns {
            lines: !any || flags.has('l'),
            words: !any || flags.has('w'),
            bytes: !any || flags.has('c'),
        };

        if flags.operands.is_empty() {
            let content = ctx.read_input(None)?;
            return ctx.line(&columns.render(Counts::of(&content), None));
        }

        let mut total = Counts::default();
        for file in &flags.operands {
            let counts = Counts::of(&ctx.read_input(Some(file))?);
            total.add(counts);
            ctx.line(&columns.render(counts, Some(file)))?;
        }
        if flags.operands.len() > 1 {
            ctx.line(&columns.render(total, Some("total")))?;
        }
        Ok(())
    }
}

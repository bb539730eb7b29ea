// src/commands/ls/mod.rs
use async_trait::async_trait;
use chrono::DateTime;

use crate::commands::utils::parse_flags;
use crate::commands::{Command, CommandContext};
use crate::fs::path::file_name;
use crate::fs::DirEntry;
use crate::shell::ShellError;

pub struct LsCommand;

const DIRECTORY_BLOCK: u64 = 4096;

fn format_size(size: u64, human_readable: bool) -> String {
    if !human_readable || size < 1024 {
        return size.to_string();
    }
    if size < 1024 * 1024 {
        let k = size as f64 / 1024.0;
        return if k < 10.0 { format!("{:.1}K", k) } else { format!("{}K", k as u64) };
    }
    let m = size as f64 / (1024.0 * 1024.0);
    if m < 10.0 { format!("{:.1}M", m) } else { format!("{}M", m as u64) }
}

fn format_time(modified_ms: i64) -> String {
    DateTime::from_timestamp_millis(modified_ms)
        .map(|t| t.format("%b %e %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn display_name(entry: &DirEntry) -> String {
    if entry.is_directory() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}

fn long_line(entry: &DirEntry, human_readable: bool) -> String {
    let size = if entry.is_directory() { DIRECTORY_BLOCK } else { entry.size };
    format!(
        "{} {:<8} {:>6} {} {}",
        entry.permissions,
        entry.owner,
        format_size(size, human_readable),
        format_time(entry.modified),
        display_name(entry)
    )
}

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn usage(&self) -> &'static str {
        "ls [-l -a -h -d] [path...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let flags = parse_flags(&ctx.args, "lahd")?;
        let long_format = flags.has('l');
        let show_all = flags.has('a');
        let human_readable = flags.has('h');
        let list_dir_itself = flags.has('d');

        let mut paths = flags.operands.clone();
        if paths.is_empty() {
            paths.push(".".to_string());
        }
        let show_path_header = paths.len() > 1;

        for (idx, path) in paths.iter().enumerate() {
            let stat = ctx.session.vfs.stat(path)?;

            if !stat.is_directory() || list_dir_itself {
                let resolved = ctx.session.vfs.resolve(path)?;
                let entry = DirEntry {
                    name: if resolved == "/" { "/".to_string() } else { file_name(&resolved).to_string() },
                    kind: stat.kind,
                    size: stat.size(),
                    modified: stat.modified,
                    permissions: stat.permissions.clone(),
                    owner: stat.owner.clone(),
                };
                let line = if long_format {
                    long_line(&entry, human_readable)
                } else {
                    path.clone()
                };
                ctx.line(&line)?;
                continue;
            }

            let children: Vec<DirEntry> = ctx
                .session
                .vfs
                .list_directory(path)?
                .into_iter()
                .filter(|e| show_all || !e.name.starts_with('.'))
                .collect();

            if show_path_header {
                if idx > 0 {
                    ctx.line("")?;
                }
                ctx.line(&format!("{}:", path))?;
            }
            if long_format {
                ctx.line(&format!("total {}", children.len()))?;
            }
            for child in &children {
                let line = if long_format {
                    long_line(child, human_readable)
                } else {
                    display_name(child)
                };
                ctx.line(&line)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FsError;
    use crate::shell::test_support::shell;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512, true), "512");
        assert_eq!(format_size(2048, true), "2.0K");
        assert_eq!(format_size(20 * 1024, true), "20K");
        assert_eq!(format_size(3 * 1024 * 1024, true), "3.0M");
        assert_eq!(format_size(2048, false), "2048");
    }

    #[tokio::test]
    async fn test_ls_lists_sorted_with_dir_suffix() {
        let (mut sh, t) = shell();
        sh.execute("mkdir /tmp/w").await.unwrap();
        sh.execute("touch /tmp/w/b.txt /tmp/w/a.txt /tmp/w/.hidden").await.unwrap();
        sh.execute("mkdir /tmp/w/sub").await.unwrap();
        sh.execute("ls /tmp/w").await.unwrap();
        assert_eq!(t.stdout(), "a.txt\nb.txt\nsub/\n");
    }

    #[tokio::test]
    async fn test_ls_all_shows_dotfiles() {
        let (mut sh, t) = shell();
        sh.execute("touch /tmp/.rc /tmp/x").await.unwrap();
        sh.execute("ls -a /tmp").await.unwrap();
        assert_eq!(t.stdout(), ".rc\nx\n");
    }

    #[tokio::test]
    async fn test_ls_long() {
        let (mut sh, t) = shell();
        sh.execute("echo hello > /tmp/f").await.unwrap();
        sh.execute("ls -l /tmp").await.unwrap();
        let out = t.stdout();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "total 1");
        assert!(lines[1].starts_with("-rw-r--r-- guest"));
        assert!(lines[1].contains("     6 "));
        assert!(lines[1].ends_with(" f"));
    }

    #[tokio::test]
    async fn test_ls_directory_itself() {
        let (mut sh, t) = shell();
        sh.execute("ls -ld /tmp").await.unwrap();
        let out = t.stdout();
        assert!(out.starts_with("drwxr-xr-x root"));
        assert!(out.trim_end().ends_with("tmp/"));
    }

    #[tokio::test]
    async fn test_ls_file_operand_and_headers() {
        let (mut sh, t) = shell();
        sh.execute("touch /tmp/one").await.unwrap();
        sh.execute("ls /tmp/one").await.unwrap();
        sh.execute("ls /var /tmp").await.unwrap();
        assert_eq!(t.stdout(), "/tmp/one\n/var:\nlog/\n\n/tmp:\none\n");
    }

    #[tokio::test]
    async fn test_ls_missing() {
        let (mut sh, t) = shell();
        let err = sh.execute("ls /nope").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Fs(FsError::NotFound { .. })));
        assert_eq!(t.stderr(), "ls: /nope: No such file or directory\n");
    }
}

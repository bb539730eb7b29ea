// src/commands/echo/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::shell::ShellError;

pub struct EchoCommand;

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn usage(&self) -> &'static str {
        "echo [-n] [-e] [text...]"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let args = &ctx.args;
        let mut no_newline = false;
        let mut interpret_escapes = false;
        let mut start_index = 0;

        while start_index < args.len() {
            match args[start_index].as_str() {
                "-n" => no_newline = true,
                "-e" => interpret_escapes = true,
                "-E" => interpret_escapes = false,
                "-ne" | "-en" => {
                    no_newline = true;
                    interpret_escapes = true;
                }
                _ => break,
            }
            start_index += 1;
        }

        let mut output = ctx.session.env.expand(&args[start_index..].join(" "));
        if interpret_escapes {
            let (text, stop) = process_escapes(&output);
            output = text;
            no_newline |= stop;
        }

        if no_newline {
            ctx.out.fragment(&output)
        } else {
            ctx.out.text(&format!("{}\n", output))
        }
    }
}

/// Expand `\n`, `\t` and `\\`. `\c` stops output and suppresses the newline,
/// reported by the second tuple field.
fn process_escapes(input: &str) -> (String, bool) {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('c') => return (result, true),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    (result, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::test_support::shell;

    #[test]
    fn test_process_escapes() {
        assert_eq!(process_escapes("a\\nb"), ("a\nb".to_string(), false));
        assert_eq!(process_escapes("x\\cy"), ("x".to_string(), true));
        assert_eq!(process_escapes("\\q\\"), ("\\q\\".to_string(), false));
    }

    #[tokio::test]
    async fn test_echo_expands_variables() {
        let (mut sh, t) = shell();
        sh.execute("echo hello $USER from ${HOSTNAME}").await.unwrap();
        assert_eq!(t.stdout(), "hello guest from portfolio\n");
    }

    #[tokio::test]
    async fn test_echo_flags_into_file() {
        let (mut sh, _) = shell();
        sh.execute("echo -n abc > /tmp/n").await.unwrap();
        assert_eq!(sh.session().vfs.read_file("/tmp/n").unwrap(), "abc");
        sh.execute("echo -e 'a\\tb\\nc' > /tmp/e").await.unwrap();
        assert_eq!(sh.session().vfs.read_file("/tmp/e").unwrap(), "a\tb\nc\n");
        sh.execute("echo > /tmp/empty").await.unwrap();
        assert_eq!(sh.session().vfs.read_file("/tmp/empty").unwrap(), "\n");
    }
}

//! curl - fetch a URL through the session's network collaborator

use std::time::Duration;

use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::network::{fetch_bounded, NetworkError};
use crate::shell::ShellError;

pub struct CurlCommand;

#[derive(Debug, Default)]
struct CurlOptions {
    url: Option<String>,
    output: Option<String>,
    silent: bool,
}

fn parse_options(args: &[String]) -> Result<CurlOptions, ShellError> {
    let mut options = CurlOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-s" | "--silent" => options.silent = true,
            "-o" | "--output" => {
                let file = iter
                    .next()
                    .ok_or_else(|| ShellError::invalid("option -o: requires parameter"))?;
                options.output = Some(file.clone());
            }
            _ if arg.starts_with('-') => {
                return Err(ShellError::invalid(format!("option {}: is unknown", arg)));
            }
            _ if options.url.is_none() => options.url = Some(arg.clone()),
            _ => return Err(ShellError::invalid("only one URL is supported")),
        }
    }

    Ok(options)
}

#[async_trait]
impl Command for CurlCommand {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn usage(&self) -> &'static str {
        "curl [-s] [-o file] <url>"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), ShellError> {
        let options = parse_options(&ctx.args)?;
        let url = options.url.ok_or_else(|| ShellError::invalid("no URL specified"))?;
        let fetcher = ctx.session.fetcher.clone().ok_or(NetworkError::Disabled)?;

        let timeout = Duration::from_millis(ctx.limits.fetch_timeout_ms);
        let body = fetch_bounded(fetcher.as_ref(), &url, timeout, ctx.limits.max_fetch_bytes).await?;

        match options.output {
            Some(file) => {
                ctx.session.vfs.write_file(&file, &body, false)?;
                if !options.silent {
                    ctx.line(&format!("saved {} bytes to {}", body.len(), file))?;
                }
                Ok(())
            }
            None => ctx.out.text(&body),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::ShellConfig;
    use crate::network::{Fetcher, NetworkError};
    use crate::shell::test_support::{shell, shell_with};
    use crate::shell::ShellError;

    struct Echoing;

    #[async_trait]
    impl Fetcher for Echoing {
        async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
            Ok(format!("body of {}\n", url))
        }
    }

    #[tokio::test]
    async fn test_curl_prints_body() {
        let (sh, t) = shell();
        let mut sh = sh.with_fetcher(Arc::new(Echoing));
        sh.execute("curl https://example.com/a").await.unwrap();
        assert_eq!(t.stdout(), "body of https://example.com/a\n");
    }

    #[tokio::test]
    async fn test_curl_output_file_and_pipe() {
        let (sh, t) = shell();
        let mut sh = sh.with_fetcher(Arc::new(Echoing));
        sh.execute("curl -s -o /tmp/page https://example.com").await.unwrap();
        assert_eq!(sh.session().vfs.read_file("/tmp/page").unwrap(), "body of https://example.com\n");
        sh.execute("curl https://example.com | wc -w").await.unwrap();
        assert_eq!(t.stdout(), "3\n");
    }

    #[tokio::test]
    async fn test_curl_without_network() {
        let (mut sh, t) = shell();
        let err = sh.execute("curl https://example.com").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Network(NetworkError::Disabled)));
        assert_eq!(t.stderr(), "curl: network access is disabled\n");
    }

    #[tokio::test]
    async fn test_curl_limits() {
        let mut config = ShellConfig::default();
        config.limits.max_fetch_bytes = 8;
        let (sh, _) = shell_with(config);
        let mut sh = sh.with_fetcher(Arc::new(Echoing));
        let err = sh.execute("curl https://example.com").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Network(NetworkError::TooLarge { limit: 8 })));
        let err = sh.execute("curl ftp://example.com").await.unwrap_err();
        assert!(matches!(err.error, ShellError::Network(NetworkError::InvalidUrl { .. })));
    }
}

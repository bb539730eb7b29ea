use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vshell::shell::ConsoleView;
use vshell::{Shell, ShellConfig};

#[derive(Parser)]
#[command(name = "vshell")]
#[command(about = "A virtual Unix shell over a persisted in-memory file system")]
#[command(version)]
struct Cli {
    /// Run these commands, one per line, instead of reading stdin
    #[arg(short = 'c')]
    script: Option<String>,

    /// TOML configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Persist the file system to this file
    #[arg(long = "state")]
    state: Option<PathBuf>,

    /// Store snapshots as plain JSON
    #[arg(long = "no-compress")]
    no_compress: bool,

    /// Script file to execute
    #[arg()]
    script_file: Option<PathBuf>,
}

async fn run_lines(shell: &mut Shell, text: &str) -> i32 {
    let mut status = 0;
    for line in text.lines() {
        status = shell.run_line(line).await;
    }
    status
}

async fn repl(shell: &mut Shell) -> std::io::Result<i32> {
    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut status = 0;

    loop {
        if interactive {
            stdout.write_all(shell.prompt().as_bytes()).await?;
            stdout.flush().await?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "exit" {
            break;
        }
        status = shell.run_line(&line).await;
    }
    Ok(status)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match ShellConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
        None => ShellConfig::default(),
    };
    if cli.state.is_some() {
        config.state_file = cli.state.clone();
    }
    if cli.no_compress {
        config.compress_snapshots = false;
    }

    let mut shell = Shell::from_config(&config, Box::new(ConsoleView));

    let status = if let Some(script) = &cli.script {
        run_lines(&mut shell, script).await
    } else if let Some(file) = &cli.script_file {
        match std::fs::read_to_string(file) {
            Ok(content) => run_lines(&mut shell, &content).await,
            Err(e) => {
                eprintln!("Error: Cannot read script file: {}: {}", file.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        match repl(&mut shell).await {
            Ok(status) => status,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    };

    std::process::exit(status);
}

//! Pipeline execution
//!
//! Stages run strictly left to right. Every stage but the last writes into a
//! capture buffer that becomes the next stage's input; the first failing
//! stage ends the line.

use tracing::debug;

use super::error::{CommandFailure, ShellError};
use super::glob;
use super::tokenizer::{split_unquoted, tokenize, Token};
use super::{Output, Session, SHELL_NAME};
use crate::commands::{CommandContext, CommandRegistry};
use crate::config::Limits;

fn syntax(error: ShellError) -> CommandFailure {
    CommandFailure::new(SHELL_NAME, error)
}

/// `~` and `~/...` refer to the home directory.
pub(crate) fn expand_home(text: &str, home: &str) -> Option<String> {
    match text.strip_prefix('~') {
        Some("") => Some(home.to_string()),
        Some(rest) if rest.starts_with('/') => {
            Some(format!("{}{}", home.trim_end_matches('/'), rest))
        }
        _ => None,
    }
}

fn expand_tilde(token: &Token, home: &str) -> Token {
    if token.quoted {
        return token.clone();
    }
    expand_home(&token.text, home).map_or_else(|| token.clone(), |text| Token::bare(&text))
}

/// Tokenize a stage, apply an alias to its first word and expand wildcards.
pub(crate) fn prepare(
    session: &Session,
    limits: &Limits,
    stage: &str,
) -> Result<Vec<String>, CommandFailure> {
    let tokens = tokenize(stage, limits).map_err(syntax)?;
    let Some(first) = tokens.first() else {
        return Ok(Vec::new());
    };
    let alias = if first.quoted {
        None
    } else {
        session.aliases.get(&first.text)
    };

    // exact match only, and the expansion is not looked up again
    let words: Vec<Token> = match alias {
        Some(expansion) => {
            let mut words = tokenize(expansion, limits).map_err(syntax)?;
            words.extend(tokens.into_iter().skip(1));
            words
        }
        _ => tokens,
    };
    let Some(command) = words.first().map(|t| t.text.clone()) else {
        return Ok(Vec::new());
    };

    let mut argv = vec![command.clone()];
    for word in &words[1..] {
        let word = expand_tilde(word, session.vfs.home());
        let expanded = glob::expand(&word, &session.vfs, limits)
            .map_err(|e| CommandFailure::new(command.as_str(), e))?;
        argv.extend(expanded);
    }
    if argv.len() > limits.max_args {
        return Err(CommandFailure::new(
            command.as_str(),
            ShellError::parse(format!(
                "too many arguments ({}, limit {})",
                argv.len(),
                limits.max_args
            )),
        ));
    }
    Ok(argv)
}

/// Resolve and run one command.
pub(crate) async fn dispatch(
    session: &mut Session,
    registry: &CommandRegistry,
    limits: &Limits,
    argv: Vec<String>,
    stdin: Option<String>,
    out: &mut Output,
) -> Result<(), CommandFailure> {
    let mut argv = argv.into_iter();
    let Some(name) = argv.next() else {
        return Ok(());
    };
    let Some(cmd) = registry.get(&name) else {
        return Err(CommandFailure::new(name, ShellError::CommandNotFound));
    };
    debug!(command = %name, "dispatch");

    let args: Vec<String> = argv.collect();
    if args.iter().any(|a| a == "--help") {
        return out
            .line(&format!("usage: {}", cmd.usage()))
            .map_err(|e| CommandFailure::new(name, e));
    }

    let mut ctx = CommandContext {
        args,
        stdin,
        session,
        out,
        registry,
        limits,
    };
    cmd.execute(&mut ctx)
        .await
        .map_err(|e| CommandFailure::new(name, e))
}

/// Run a `|`-separated command line, rendering the last stage into `out`.
pub(crate) async fn run_pipeline(
    session: &mut Session,
    registry: &CommandRegistry,
    limits: &Limits,
    line: &str,
    out: &mut Output,
) -> Result<(), CommandFailure> {
    let stages = split_unquoted(line, '|');
    if stages.len() > limits.max_pipeline_stages {
        return Err(syntax(ShellError::parse(format!(
            "too many pipeline stages ({}, limit {})",
            stages.len(),
            limits.max_pipeline_stages
        ))));
    }
    if stages.len() > 1 && stages.iter().any(|s| s.trim().is_empty()) {
        return Err(syntax(ShellError::parse("syntax error near unexpected token '|'")));
    }

    let last = stages.len() - 1;
    let mut input: Option<String> = None;
    for (i, stage) in stages.iter().enumerate() {
        let argv = prepare(session, limits, stage)?;
        if i < last {
            let mut capture = out.capture(limits.max_capture_bytes);
            dispatch(session, registry, limits, argv, input.take(), &mut capture).await?;
            input = Some(capture.finish());
        } else {
            dispatch(session, registry, limits, argv, input.take(), out).await?;
        }
    }
    Ok(())
}

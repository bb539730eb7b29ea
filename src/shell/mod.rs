//! Shell
//!
//! Turns one raw input line into dispatched built-in commands:
//! redirection detection, pipeline splitting, tokenizing, alias and wildcard
//! expansion, dispatch and error routing. All durable state is reached
//! through the [`Session`], which owns the file system.

pub mod alias;
pub mod env;
pub mod error;
pub mod glob;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod redirect;
pub mod tokenizer;

use std::sync::Arc;

use tracing::debug;

pub use alias::Aliases;
pub use env::Environment;
pub use error::{CommandFailure, ShellError};
pub use history::History;
pub use output::{ConsoleView, Output, OutputSink, Stream, Transcript};

use crate::commands::{create_builtin_registry, CommandRegistry};
use crate::config::{Limits, ShellConfig};
use crate::fs::path::{is_descendant, join};
use crate::fs::{FileStore, MemoryStore, SnapshotStore, Vfs, VfsOptions};
use crate::network::Fetcher;
use redirect::{split_redirect, RedirectKind};
use tokenizer::check_length;

/// Name used for errors that belong to no particular command.
pub const SHELL_NAME: &str = "sh";

/// Exit status for a command that could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// The state one interactive session works on.
pub struct Session {
    pub vfs: Vfs,
    pub env: Environment,
    pub aliases: Aliases,
    pub history: History,
    pub fetcher: Option<Arc<dyn Fetcher>>,
}

impl Session {
    /// Prompt text: `$PS1` expanded when set, `user@host:dir$ ` otherwise.
    pub fn prompt(&self) -> String {
        let cwd = self.vfs.cwd();
        let home = self.vfs.home();
        let short = if cwd == home {
            "~".to_string()
        } else if home != "/" && is_descendant(cwd, home) {
            format!("~{}", &cwd[home.len()..])
        } else {
            cwd.to_string()
        };

        match self.env.get("PS1") {
            Some(ps1) => self.env.expand(ps1).replace("\\w", &short),
            None => format!(
                "{}@{}:{}$ ",
                self.env.get("USER").unwrap_or("guest"),
                self.env.get("HOSTNAME").unwrap_or("localhost"),
                short
            ),
        }
    }
}

pub struct Shell {
    session: Session,
    registry: CommandRegistry,
    output: Output,
    limits: Limits,
}

impl Shell {
    /// Build a shell over `store`, rendering into `view`.
    pub fn new(config: &ShellConfig, store: Box<dyn SnapshotStore>, view: Box<dyn OutputSink>) -> Self {
        let options = VfsOptions {
            owner: config.user.clone(),
            hostname: config.hostname.clone(),
            home: config.home_dir(),
            compress: config.compress_snapshots,
            limits: config.limits.clone(),
        };
        let vfs = Vfs::open(store, options);
        let home = vfs.home().to_string();

        let mut env = Environment::new();
        env.set("USER", &config.user);
        env.set("HOSTNAME", &config.hostname);
        env.set("HOME", &home);
        env.set("SHELL", "/bin/sh");
        env.set("PWD", vfs.cwd());
        env.set("OLDPWD", vfs.cwd());

        let aliases = Aliases::load(&vfs, &join(&home, ".aliases"));
        let history = History::load(&vfs, &join(&home, ".history"), config.limits.max_history);

        Self {
            session: Session {
                vfs,
                env,
                aliases,
                history,
                fetcher: None,
            },
            registry: create_builtin_registry(),
            output: Output::new(view),
            limits: config.limits.clone(),
        }
    }

    /// Build a shell with the store the config asks for: a file when
    /// `state_file` is set, memory otherwise.
    pub fn from_config(config: &ShellConfig, view: Box<dyn OutputSink>) -> Self {
        let store: Box<dyn SnapshotStore> = match &config.state_file {
            Some(path) => Box::new(FileStore::new(path, config.store_capacity)),
            None => Box::new(MemoryStore::new(config.store_capacity)),
        };
        Self::new(config, store, view)
    }

    /// Attach the collaborator used by network built-ins.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.session.fetcher = Some(fetcher);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    /// Record `line` in the history, run it and return its exit status.
    pub async fn run_line(&mut self, line: &str) -> i32 {
        if line.trim().is_empty() {
            return 0;
        }
        self.session.history.record(&mut self.session.vfs, line);
        match self.execute(line).await {
            Ok(()) => 0,
            Err(f) if matches!(f.error, ShellError::CommandNotFound) => EXIT_NOT_FOUND,
            Err(_) => 1,
        }
    }

    /// Run one line. A failure has already been reported through the active
    /// error sink when this returns; it is handed back for inspection.
    pub async fn execute(&mut self, line: &str) -> Result<(), CommandFailure> {
        let Shell {
            session,
            registry,
            output,
            limits,
        } = self;

        let split = check_length(line, limits).and_then(|()| split_redirect(line, limits));
        let (command, redirect) = match split {
            Ok(split) => split,
            Err(e) => {
                let failure = CommandFailure::new(SHELL_NAME, e);
                output.view_error(&failure.to_string());
                return Err(failure);
            }
        };

        let Some(redirect) = redirect else {
            let result = pipeline::run_pipeline(session, registry, limits, command, output).await;
            if let Err(failure) = &result {
                report(output, failure);
            }
            return result;
        };
        let target = if redirect.quoted {
            redirect.target.clone()
        } else {
            pipeline::expand_home(&redirect.target, session.vfs.home())
                .unwrap_or_else(|| redirect.target.clone())
        };
        debug!(%target, kind = ?redirect.kind, "redirect");

        match redirect.kind {
            RedirectKind::Overwrite | RedirectKind::Append => {
                let mut capture = output.capture(limits.max_capture_bytes);
                let result =
                    pipeline::run_pipeline(session, registry, limits, command, &mut capture).await;
                let captured = capture.finish();
                if let Err(failure) = result {
                    report(output, &failure);
                    return Err(failure);
                }
                let append = redirect.kind == RedirectKind::Append;
                session
                    .vfs
                    .write_file(&target, &captured, append)
                    .map_err(|e| {
                        let failure = CommandFailure::new(SHELL_NAME, e.into());
                        report(output, &failure);
                        failure
                    })
            }
            RedirectKind::Stderr => {
                let mut capture = output.capture_errors(limits.max_capture_bytes);
                let result =
                    pipeline::run_pipeline(session, registry, limits, command, &mut capture).await;
                if let Err(failure) = &result {
                    report(&mut capture, failure);
                }
                let captured = capture.finish();
                if let Err(e) = session.vfs.write_file(&target, &captured, false) {
                    let failure = CommandFailure::new(SHELL_NAME, e.into());
                    output.view_error(&failure.to_string());
                    return Err(failure);
                }
                result
            }
        }
    }
}

/// Route a failure to the active error sink, falling back to the view when
/// that sink is full.
fn report(output: &mut Output, failure: &CommandFailure) {
    let message = failure.to_string();
    if output.error_line(&message).is_err() {
        output.view_error(&message);
    }
}

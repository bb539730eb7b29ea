//! vshell - a single-session virtual Unix shell
//!
//! A virtual file system persisted through a compressing codec into a
//! size-bounded store, and a shell that tokenizes, expands, pipes and
//! redirects lines into built-in commands working on that file system.

pub mod codec;
pub mod commands;
pub mod config;
pub mod fs;
pub mod network;
pub mod shell;

pub use config::{Limits, ShellConfig};
pub use shell::{Session, Shell};

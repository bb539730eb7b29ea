// src/commands/mod.rs
pub mod alias_cmd;
pub mod cat;
pub mod cd;
pub mod clear_cmd;
pub mod cp;
pub mod curl;
pub mod echo;
pub mod env;
pub mod find;
pub mod grep;
pub mod head;
pub mod help_cmd;
pub mod history_cmd;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod pwd;
pub mod registry;
pub mod rm;
pub mod rmdir_cmd;
pub mod tail;
pub mod touch;
pub mod types;
pub mod unalias_cmd;
pub mod utils;
pub mod wc;

pub use registry::{create_builtin_registry, register_builtins, CommandRegistry};
pub use types::{Command, CommandContext};

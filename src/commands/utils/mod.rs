// src/commands/utils/mod.rs
pub mod flags;
pub mod head_tail;

pub use flags::{parse_flags, Flags};
pub use head_tail::{get_head, get_tail, parse_head_tail_args, run_head_tail, HeadTailOptions};

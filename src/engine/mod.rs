//! Engine module: per-file processing and its collaborators.

pub mod arg_parser;
pub mod cli;
pub mod conflict;
pub mod lock;
pub mod process;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use conflict::{Resolution, resolve_output, split_extension};
pub use lock::{LockAttempt, LockToken, lock_path};
pub use process::process_file;
pub use tools::{glob_match, mask_matches};

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::types::ConflictPolicy;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Concurrent batch file transformer: XOR every matching file with an 8-byte
/// key into a separate output directory.
#[derive(Clone, Parser)]
#[command(name = "xorbatch")]
#[command(about = "Transform files matching a mask into OUT; same key decodes.")]
pub struct Cli {
    /// Input directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Output directory. Required (here or in `.xorbatch.toml`); must differ
    /// from the input directory.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Filename mask. Substring by default; `*`/`?` switch to glob matching.
    #[arg(long, short)]
    pub mask: Option<String>,

    /// 8 key bytes in hex, spaces optional: "00 ab 12 ff 00 00 00 00".
    #[arg(long, short)]
    pub key: Option<String>,

    /// Delete each source file after its output is committed.
    #[arg(long, short)]
    pub delete: bool,

    /// What to do when the output name already exists.
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictArg>,

    /// Re-scan the input directory every N seconds until Ctrl-C.
    #[arg(long, short)]
    pub repeat: Option<u64>,

    /// Worker thread count. Default: available parallelism, capped.
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Verbose output.
    #[arg(long, short)]
    pub verbose: bool,
}

/// CLI spelling of [`ConflictPolicy`].
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConflictArg {
    Overwrite,
    Increment,
    Skip,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(a: ConflictArg) -> Self {
        match a {
            ConflictArg::Overwrite => ConflictPolicy::Overwrite,
            ConflictArg::Increment => ConflictPolicy::Increment,
            ConflictArg::Skip => ConflictPolicy::Skip,
        }
    }
}

impl ConflictArg {
    pub fn parse_name(s: &str) -> Option<ConflictArg> {
        match s {
            "overwrite" => Some(ConflictArg::Overwrite),
            "increment" => Some(ConflictArg::Increment),
            "skip" => Some(ConflictArg::Skip),
            _ => None,
        }
    }
}

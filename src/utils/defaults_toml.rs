//! Load `.xorbatch.toml` from the input directory (CLI only). Lib callers
//! inject config directly via [`RunConfig`](crate::RunConfig).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultsToml {
    #[serde(default)]
    settings: RunSection,
}

#[derive(Debug, Default, Deserialize)]
struct RunSection {
    out: Option<String>,
    mask: Option<String>,
    key: Option<String>,
    delete: Option<bool>,
    on_conflict: Option<String>,
    repeat: Option<u64>,
    threads: Option<usize>,
}

/// Raw defaults read from the file; the CLI layer merges these under its own
/// flags and parses key/policy strings with the rest of the arguments.
#[derive(Debug, Default)]
pub(crate) struct FileDefaults {
    pub out: Option<PathBuf>,
    pub mask: Option<String>,
    pub key: Option<String>,
    pub delete: Option<bool>,
    pub on_conflict: Option<String>,
    pub repeat: Option<u64>,
    pub threads: Option<usize>,
}

/// Load `.xorbatch.toml` from `dir` if present. Returns None if the file is
/// missing or unreadable. CLI only.
pub(crate) fn load_defaults_toml(dir: &Path) -> Option<FileDefaults> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    let parsed: DefaultsToml = toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()?;
    let s = parsed.settings;
    Some(FileDefaults {
        out: s.out.map(PathBuf::from),
        mask: s.mask,
        key: s.key,
        delete: s.delete,
        on_conflict: s.on_conflict,
        repeat: s.repeat,
        threads: s.threads,
    })
}

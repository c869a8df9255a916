//! Output name-conflict resolution.

use std::path::{Path, PathBuf};

use crate::types::ConflictPolicy;

/// What to do with a candidate output name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Write to this path (publish step still guards against races, see
    /// [`process_file`](crate::engine::process::process_file)).
    Write(PathBuf),
    /// Policy says leave the existing file alone; no write, no error.
    Skip,
}

/// Resolve the final output path for `name` under `policy`, against the
/// current contents of `out_dir`. Deterministic for a fixed directory
/// snapshot; never creates or reserves the returned path — reservation
/// happens at commit time.
pub fn resolve_output(out_dir: &Path, name: &str, policy: ConflictPolicy) -> Resolution {
    let desired = out_dir.join(name);
    match policy {
        ConflictPolicy::Overwrite => Resolution::Write(desired),
        ConflictPolicy::Skip => {
            if desired.exists() {
                Resolution::Skip
            } else {
                Resolution::Write(desired)
            }
        }
        ConflictPolicy::Increment => {
            if !desired.exists() {
                return Resolution::Write(desired);
            }
            Resolution::Write(next_free_increment(out_dir, name, 1))
        }
    }
}

/// First unused `"{base} {n}.{ext}"` (or `"{base} {n}"` for extensionless
/// names) in `out_dir`, probing from `start`.
pub fn next_free_increment(out_dir: &Path, name: &str, start: u32) -> PathBuf {
    let (base, ext) = split_extension(name);
    let mut n = start;
    loop {
        let candidate = match ext {
            Some(ext) => out_dir.join(format!("{base} {n}.{ext}")),
            None => out_dir.join(format!("{base} {n}")),
        };
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Split a filename at the last dot. `"archive.tar.gz"` → `("archive.tar",
/// Some("gz"))`; `"README"` → `("README", None)`. Dotfiles like `".hidden"`
/// are treated as extension-less.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => (base, Some(ext)),
        _ => (name, None),
    }
}

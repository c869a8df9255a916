//! Single-file processor: lock, resolve, stream-transform into a staging
//! file, publish atomically, optionally delete the source.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::codec::transform_stream;
use crate::engine::conflict::{Resolution, next_free_increment, resolve_output};
use crate::engine::lock::{LockAttempt, LockToken};
use crate::types::{ConflictPolicy, ProcessOutcome, RunConfig};
use crate::utils::config::PART_SUFFIX;

/// Process one matched filename from the input directory.
///
/// Exactly one terminal [`ProcessOutcome`] per call. The lock token is held
/// from the first step and released on every exit path; a failure anywhere
/// abandons the staging file and never touches the source, regardless of the
/// delete flag.
pub fn process_file(config: &RunConfig, name: &str) -> ProcessOutcome {
    let _lock = match LockToken::try_acquire(&config.input_dir, name) {
        Ok(LockAttempt::Acquired(token)) => token,
        Ok(LockAttempt::Contended) => return ProcessOutcome::LockContended,
        Err(e) => return ProcessOutcome::Failed(format!("acquire lock for {name}: {e}")),
    };

    let final_path = match resolve_output(&config.output_dir, name, config.conflict) {
        Resolution::Write(path) => path,
        Resolution::Skip => {
            debug!("{name}: output exists, skipping");
            return ProcessOutcome::Skipped;
        }
    };

    // Staging name is derived from the source name, which the lock makes
    // unique among live workers. Hidden so a concurrent resolver never probes
    // into it.
    let staging = config.output_dir.join(format!(".{name}{PART_SUFFIX}"));
    if let Err(e) = write_staging(config, name, &staging) {
        remove_staging(&staging);
        return ProcessOutcome::Failed(format!("transform {name}: {e}"));
    }

    let output = match publish(&staging, &final_path, name, config) {
        Ok(Publish::Committed(path)) => path,
        Ok(Publish::LostRace) => {
            debug!("{name}: output appeared before commit, skipping");
            remove_staging(&staging);
            return ProcessOutcome::Skipped;
        }
        Err(e) => {
            remove_staging(&staging);
            return ProcessOutcome::Failed(format!("publish {name}: {e}"));
        }
    };

    if config.delete_source {
        let source = config.input_dir.join(name);
        if let Err(e) = fs::remove_file(&source) {
            // Output is already valid; losing the source delete is not fatal.
            warn!("failed to delete source {}: {}", source.display(), e);
        }
    }

    debug!("{name} -> {}", output.display());
    ProcessOutcome::Committed { output }
}

/// Stream the source through the codec into `staging`.
fn write_staging(config: &RunConfig, name: &str, staging: &Path) -> std::io::Result<()> {
    let source = File::open(config.input_dir.join(name))?;
    let dest = File::create(staging)?;
    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(dest);
    transform_stream(&config.key, &mut reader, &mut writer)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
}

enum Publish {
    Committed(PathBuf),
    /// Another writer claimed the path between resolution and commit while
    /// the policy forbids replacing it.
    LostRace,
}

/// Make the fully written staging file visible under its final name.
///
/// `Overwrite` renames over the target. The other policies publish
/// create-if-absent (hard link, then unlink the staging name) so the window
/// between resolution and commit cannot clobber a file that appeared in
/// between: `Increment` re-probes for the next free name, `Skip` reports the
/// lost race.
fn publish(
    staging: &Path,
    final_path: &Path,
    source_name: &str,
    config: &RunConfig,
) -> std::io::Result<Publish> {
    if config.conflict == ConflictPolicy::Overwrite {
        fs::rename(staging, final_path)?;
        return Ok(Publish::Committed(final_path.to_path_buf()));
    }

    let mut target = final_path.to_path_buf();
    loop {
        match fs::hard_link(staging, &target) {
            Ok(()) => {
                remove_staging(staging);
                return Ok(Publish::Committed(target));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => match config.conflict {
                ConflictPolicy::Skip => return Ok(Publish::LostRace),
                // Re-probe from the source name so a lost race on
                // "report 1.txt" tries "report 2.txt", not "report 1 1.txt".
                _ => target = next_free_increment(&config.output_dir, source_name, 1),
            },
            Err(e) => return Err(e),
        }
    }
}

fn remove_staging(staging: &Path) {
    if staging.exists()
        && let Err(e) = fs::remove_file(staging)
    {
        warn!("failed to remove staging file {}: {}", staging.display(), e);
    }
}

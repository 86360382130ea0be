use crate::models::{DeletionOutcome, FileToDelete};
use std::fs;
use tracing::{debug, error, info};

/// Remove the given files from disk.
///
/// Entries are processed independently: one failure never stops the rest. A
/// file already gone from its recorded path is skipped silently, so replaying
/// the same list is idempotent. Freed bytes are the sizes recorded at scan
/// time, since the file may no longer be there to stat.
pub fn delete_files(files: &[FileToDelete]) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();

    for file in files {
        if !file.file_path.exists() {
            debug!("'{}' no longer exists, skipping", file.file_path.display());
            continue;
        }

        match fs::remove_file(&file.file_path) {
            Ok(()) => {
                outcome.deleted_count += 1;
                outcome.freed_bytes += file.size;
                debug!("deleted: {}", file.file_path.display());
            }
            Err(e) => {
                error!("Failed to remove '{}': {}", file.file_path.display(), e);
                outcome.errors.push((file.file_path.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Deletion pass finished: {} files removed, {} bytes freed, {} errors",
        outcome.deleted_count,
        outcome.freed_bytes,
        outcome.errors.len()
    );
    outcome
}

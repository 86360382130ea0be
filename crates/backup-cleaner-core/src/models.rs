use chrono::NaiveDate;
use std::path::PathBuf;

/// A single backup file discovered in a customer directory.
#[derive(Debug, Clone)]
pub struct BackupFile {
    pub file_name: String,
    pub file_path: PathBuf,
    pub extension: String,
    pub size: u64,
    /// Logical backup date, inferred from the file name or its mtime.
    pub backup_date: NaiveDate,
}

/// All backup files sharing one inferred calendar day for a customer.
#[derive(Debug, Clone)]
pub struct BackupSet {
    pub date: NaiveDate,
    pub files: Vec<BackupFile>,
}

impl BackupSet {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// A customer directory with its retention parameters.
#[derive(Debug, Clone)]
pub struct CustomerFolder {
    pub folder_name: String,
    pub folder_path: PathBuf,
    /// Number of most recent backup sets exempt from deletion.
    pub keep_count: usize,
    /// Included in batch cleanup passes.
    pub enabled: bool,
    /// False when the folder has no saved settings entry yet. Unconfigured
    /// folders never participate in unattended passes.
    pub configured: bool,
}

/// Projection of a file slated for removal. Carries everything the deletion
/// pass needs without re-reading the grouped sets.
#[derive(Debug, Clone)]
pub struct FileToDelete {
    pub customer_name: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub set_date: NaiveDate,
    pub size: u64,
}

/// Result of one deletion pass.
#[derive(Debug, Default)]
pub struct DeletionOutcome {
    pub deleted_count: usize,
    pub freed_bytes: u64,
    pub errors: Vec<(PathBuf, String)>,
}

/// Per-customer retention statistics, recomputed on demand from already
/// grouped sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerStats {
    pub set_count: usize,
    pub files_to_delete: usize,
    pub bytes_to_free: u64,
}

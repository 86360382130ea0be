use crate::dates;
use crate::error::Error;
use crate::ignore::IgnoreMatcher;
use crate::models::{BackupFile, BackupSet, CustomerFolder};
use crate::settings::Settings;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// File extensions recognized as backup artifacts. Fixed, matched
/// case-insensitively, not user-configurable.
pub const BACKUP_EXTENSIONS: [&str; 7] = ["bak", "trn", "zip", "7z", "rar", "gz", "tar"];

pub fn is_backup_extension(extension: &str) -> bool {
    BACKUP_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(extension))
}

/// Enumerate the immediate subdirectories of the backup root as customer
/// folders, skipping ignored names. Folders with a saved settings entry get
/// their stored parameters; newly-discovered folders get the defaults and
/// `configured = false`. A missing root yields an empty list, not an error.
pub fn scan_customer_folders(
    root: &Path,
    ignore: &IgnoreMatcher,
    settings: &Settings,
) -> Result<Vec<CustomerFolder>, Error> {
    let mut customers = Vec::new();

    if !root.is_dir() {
        return Ok(customers);
    }

    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry under {}: {}", root.display(), e);
                continue;
            }
        };

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let folder_name = entry.file_name().to_string_lossy().into_owned();
        if ignore.is_ignored(&folder_name) {
            continue;
        }

        let customer = match settings.customers.get(&folder_name) {
            Some(saved) => CustomerFolder {
                folder_name,
                folder_path: entry.path(),
                keep_count: saved.keep_count,
                enabled: saved.enabled,
                configured: true,
            },
            None => CustomerFolder {
                folder_name,
                folder_path: entry.path(),
                keep_count: settings.default_keep_count,
                enabled: true,
                configured: false,
            },
        };
        customers.push(customer);
    }

    customers.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
    Ok(customers)
}

/// Scan one customer directory and group its backup files into dated sets,
/// newest first. Grouping is by calendar day; two files with the same day
/// always land in the same set. The descending order is a contract for every
/// downstream consumer.
pub fn scan_backup_sets(dir: &Path, ignore: &IgnoreMatcher) -> Result<Vec<BackupSet>, Error> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut grouped: BTreeMap<NaiveDate, Vec<BackupFile>> = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry under {}: {}", dir.display(), e);
                continue;
            }
        };

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let path = entry.path();
        let extension = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => continue,
        };
        if !is_backup_extension(&extension) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if ignore.is_ignored(&file_name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Error reading metadata for {}: {}", path.display(), e);
                continue;
            }
        };

        let fallback = metadata
            .modified()
            .map(|mtime| DateTime::<Local>::from(mtime).date_naive())
            .unwrap_or_else(|_| Local::now().date_naive());
        let backup_date = dates::extract_date(&file_name, fallback);

        grouped.entry(backup_date).or_default().push(BackupFile {
            file_name,
            file_path: path,
            extension,
            size: metadata.len(),
            backup_date,
        });
    }

    // BTreeMap iterates ascending; reverse for the newest-first contract.
    Ok(grouped
        .into_iter()
        .rev()
        .map(|(date, files)| BackupSet { date, files })
        .collect())
}

use crate::deletion;
use crate::error::Error;
use crate::ignore::IgnoreMatcher;
use crate::models::{BackupSet, CustomerFolder, FileToDelete};
use crate::retention;
use crate::scanner;
use crate::settings::Settings;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Cooperative cancellation flag. Checked once per customer, before that
/// customer's scan starts; a scan already underway runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One scanned customer: the folder plus its grouped backup sets.
#[derive(Debug, Clone)]
pub struct CustomerScan {
    pub customer: CustomerFolder,
    pub sets: Vec<BackupSet>,
}

/// Aggregate result of scanning every customer under the backup root.
#[derive(Debug)]
pub struct ScanOutcome {
    pub customers: Vec<CustomerScan>,
    pub total_sets: usize,
    pub total_files: usize,
    pub total_bytes: u64,
    pub scan_duration: Duration,
    pub cancelled: bool,
}

/// Summary of one unattended cleanup pass.
#[derive(Debug, Default)]
pub struct AutoCleanupReport {
    pub customers_processed: usize,
    pub deleted_count: usize,
    pub freed_bytes: u64,
    pub errors: Vec<(PathBuf, String)>,
    /// Newly-discovered folders with no settings entry, skipped until
    /// explicitly enabled.
    pub skipped_new: Vec<String>,
}

/// Drives the scan → group → evaluate → delete pipeline over all customer
/// directories under one backup root.
pub struct CleanupEngine {
    root: PathBuf,
    ignore: IgnoreMatcher,
}

impl CleanupEngine {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreMatcher) -> Self {
        Self {
            root: root.into(),
            ignore,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate customer folders and scan each one's backup sets. Customer
    /// scans are independent and run in parallel; totals are aggregated in a
    /// single pass once the parallel section is done.
    pub fn scan(&self, settings: &Settings, cancel: &CancelFlag) -> Result<ScanOutcome, Error> {
        let folders = scanner::scan_customer_folders(&self.root, &self.ignore, settings)?;
        info!(
            "Scanning {} customer folders under {}",
            folders.len(),
            self.root.display()
        );

        let scan_start = Instant::now();
        let customers: Vec<CustomerScan> = folders
            .into_par_iter()
            .filter_map(|customer| {
                if cancel.is_cancelled() {
                    debug!("Scan cancelled before {}", customer.folder_name);
                    return None;
                }
                let sets = match scanner::scan_backup_sets(&customer.folder_path, &self.ignore) {
                    Ok(sets) => sets,
                    Err(e) => {
                        error!("Error scanning {}: {}", customer.folder_path.display(), e);
                        Vec::new()
                    }
                };
                Some(CustomerScan { customer, sets })
            })
            .collect();
        let scan_duration = scan_start.elapsed();

        let mut outcome = ScanOutcome {
            customers,
            total_sets: 0,
            total_files: 0,
            total_bytes: 0,
            scan_duration,
            cancelled: cancel.is_cancelled(),
        };
        for scan in &outcome.customers {
            outcome.total_sets += scan.sets.len();
            for set in &scan.sets {
                outcome.total_files += set.file_count();
                outcome.total_bytes += set.total_size();
            }
        }

        info!(
            "Scan completed in {:.2}s — {} customers, {} sets, {} files, {} bytes",
            scan_duration.as_secs_f64(),
            outcome.customers.len(),
            outcome.total_sets,
            outcome.total_files,
            outcome.total_bytes,
        );
        Ok(outcome)
    }

    /// Deletion candidates for every enabled customer in an existing scan,
    /// concatenated. Pure evaluation over the already-grouped sets.
    pub fn preview(
        &self,
        scans: &[CustomerScan],
        minimum_age_months: u32,
        today: NaiveDate,
    ) -> Vec<FileToDelete> {
        scans
            .iter()
            .filter(|scan| scan.customer.enabled)
            .flat_map(|scan| {
                retention::files_to_delete(&scan.customer, &scan.sets, minimum_age_months, today)
            })
            .collect()
    }

    /// The unattended pass: evaluate and delete for every enabled,
    /// previously-configured customer, with no confirmation step. Folders
    /// seen for the first time are reported and skipped. Once started, the
    /// pass is not cancellable; partial completion replays idempotently.
    pub fn run_auto_cleanup(
        &self,
        settings: &Settings,
        today: NaiveDate,
    ) -> Result<AutoCleanupReport, Error> {
        let folders = scanner::scan_customer_folders(&self.root, &self.ignore, settings)?;
        let mut report = AutoCleanupReport::default();

        for customer in folders {
            if !customer.configured {
                report.skipped_new.push(customer.folder_name);
                continue;
            }
            if !customer.enabled {
                debug!("Skipping disabled customer {}", customer.folder_name);
                continue;
            }

            let sets = match scanner::scan_backup_sets(&customer.folder_path, &self.ignore) {
                Ok(sets) => sets,
                Err(e) => {
                    error!("Error scanning {}: {}", customer.folder_path.display(), e);
                    continue;
                }
            };

            let files =
                retention::files_to_delete(&customer, &sets, settings.minimum_age_months, today);
            if files.is_empty() {
                report.customers_processed += 1;
                continue;
            }

            let outcome = deletion::delete_files(&files);
            report.customers_processed += 1;
            report.deleted_count += outcome.deleted_count;
            report.freed_bytes += outcome.freed_bytes;
            report.errors.extend(outcome.errors);
        }

        info!(
            "Automatic cleanup: {} customers processed, {} files removed, {} bytes freed, \
             {} errors, {} new folders skipped",
            report.customers_processed,
            report.deleted_count,
            report.freed_bytes,
            report.errors.len(),
            report.skipped_new.len(),
        );
        Ok(report)
    }
}

use backup_cleaner_core::{CancelFlag, CleanupEngine, IgnoreMatcher, Settings};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Backup root with two customers and one ignored folder:
///   acme/    three dated sets (two old, one recent)
///   globex/  one old set
///   _archive/ should never be scanned
fn create_backup_root(root: &Path) {
    let acme = root.join("acme");
    fs::create_dir_all(&acme).unwrap();
    fs::write(acme.join("acme_2023-01-10_full.bak"), b"full backup").unwrap();
    fs::write(acme.join("acme_2023-01-10_log.trn"), b"log").unwrap();
    fs::write(acme.join("acme_2023-02-10.bak"), b"full backup").unwrap();
    fs::write(acme.join("acme_2024-06-01.bak"), b"recent").unwrap();

    let globex = root.join("globex");
    fs::create_dir_all(&globex).unwrap();
    fs::write(globex.join("globex_2023-01-01.bak"), b"old").unwrap();

    let archive = root.join("_archive");
    fs::create_dir_all(&archive).unwrap();
    fs::write(archive.join("keep_2020-01-01.bak"), b"archived").unwrap();
}

fn engine_for(root: &Path) -> CleanupEngine {
    CleanupEngine::new(root, IgnoreMatcher::from_patterns(["_*"]))
}

#[test]
fn test_scan_aggregates_across_customers() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let engine = engine_for(tmp.path());
    let outcome = engine.scan(&Settings::default(), &CancelFlag::new()).unwrap();

    assert!(!outcome.cancelled);
    let names: Vec<&str> = outcome
        .customers
        .iter()
        .map(|scan| scan.customer.folder_name.as_str())
        .collect();
    assert_eq!(names, vec!["acme", "globex"]);

    assert_eq!(outcome.total_sets, 4);
    assert_eq!(outcome.total_files, 5);
    let expected_bytes: u64 = ["full backup", "log", "full backup", "recent", "old"]
        .iter()
        .map(|s| s.len() as u64)
        .sum();
    assert_eq!(outcome.total_bytes, expected_bytes);
}

#[test]
fn test_auto_cleanup_deletes_only_configured_enabled_customers() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let mut settings = Settings::default();
    settings.upsert_customer("acme", Some(true), Some(1));

    let engine = engine_for(tmp.path());
    let report = engine.run_auto_cleanup(&settings, d(2024, 6, 15)).unwrap();

    // acme: newest set kept by recency, the two 2023 sets are past the
    // one-month cutoff.
    assert_eq!(report.customers_processed, 1);
    assert_eq!(report.deleted_count, 3);
    assert!(report.errors.is_empty());
    assert_eq!(report.skipped_new, vec!["globex".to_string()]);

    let acme = tmp.path().join("acme");
    assert!(acme.join("acme_2024-06-01.bak").exists());
    assert!(!acme.join("acme_2023-01-10_full.bak").exists());
    assert!(!acme.join("acme_2023-01-10_log.trn").exists());
    assert!(!acme.join("acme_2023-02-10.bak").exists());

    // Unconfigured and ignored folders are untouched.
    assert!(tmp.path().join("globex/globex_2023-01-01.bak").exists());
    assert!(tmp.path().join("_archive/keep_2020-01-01.bak").exists());
}

#[test]
fn test_auto_cleanup_skips_disabled_customers() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let mut settings = Settings::default();
    settings.upsert_customer("acme", Some(false), Some(0));
    settings.upsert_customer("globex", Some(true), Some(0));

    let engine = engine_for(tmp.path());
    let report = engine.run_auto_cleanup(&settings, d(2024, 6, 15)).unwrap();

    assert_eq!(report.customers_processed, 1);
    assert_eq!(report.deleted_count, 1);
    assert!(report.skipped_new.is_empty());

    // Disabled acme keeps everything, even with keep_count 0.
    assert!(tmp.path().join("acme/acme_2023-01-10_full.bak").exists());
    assert!(!tmp.path().join("globex/globex_2023-01-01.bak").exists());
}

#[test]
fn test_auto_cleanup_replay_is_idempotent() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let mut settings = Settings::default();
    settings.upsert_customer("acme", Some(true), Some(1));

    let engine = engine_for(tmp.path());
    let first = engine.run_auto_cleanup(&settings, d(2024, 6, 15)).unwrap();
    assert_eq!(first.deleted_count, 3);

    let second = engine.run_auto_cleanup(&settings, d(2024, 6, 15)).unwrap();
    assert_eq!(second.deleted_count, 0);
    assert_eq!(second.freed_bytes, 0);
    assert!(second.errors.is_empty());
}

#[test]
fn test_cancelled_flag_stops_before_each_customer() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let cancel = CancelFlag::new();
    cancel.cancel();

    let engine = engine_for(tmp.path());
    let outcome = engine.scan(&Settings::default(), &cancel).unwrap();

    assert!(outcome.cancelled);
    assert!(outcome.customers.is_empty());
    assert_eq!(outcome.total_files, 0);
}

#[test]
fn test_preview_covers_enabled_customers_only() {
    let tmp = tempdir().unwrap();
    create_backup_root(tmp.path());

    let mut settings = Settings::default();
    settings.upsert_customer("acme", Some(false), Some(0));
    settings.upsert_customer("globex", Some(true), Some(0));

    let engine = engine_for(tmp.path());
    let outcome = engine.scan(&settings, &CancelFlag::new()).unwrap();
    let files = engine.preview(&outcome.customers, settings.minimum_age_months, d(2024, 6, 15));

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].customer_name, "globex");

    // Preview is pure: nothing on disk changed.
    assert!(tmp.path().join("globex/globex_2023-01-01.bak").exists());
}

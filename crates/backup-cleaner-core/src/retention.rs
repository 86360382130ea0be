use crate::models::{BackupSet, CustomerFolder, CustomerStats, FileToDelete};
use chrono::{Months, NaiveDate};

/// `today` minus `minimum_age_months`, with calendar-month semantics: the
/// day is clamped to the target month's length (Mar 31 − 1 month = Feb 28/29).
pub fn cutoff_date(today: NaiveDate, minimum_age_months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(minimum_age_months))
        .unwrap_or(NaiveDate::MIN)
}

/// The deletable subset of a newest-first set list: everything past the
/// first `keep_count` sets whose date is strictly earlier than `cutoff`.
///
/// This is the single source of truth for the dual retention rule; both the
/// file projection and the statistics below go through it, so the two can
/// never disagree.
fn deletable_sets<'a>(
    sets: &'a [BackupSet],
    keep_count: usize,
    cutoff: NaiveDate,
) -> impl Iterator<Item = &'a BackupSet> {
    sets.iter()
        .skip(keep_count)
        .filter(move |set| set.date < cutoff)
}

/// Flatten the deletable sets of one customer into deletion entries.
/// Pure: reads only its inputs, touches no filesystem.
pub fn files_to_delete(
    customer: &CustomerFolder,
    sets: &[BackupSet],
    minimum_age_months: u32,
    today: NaiveDate,
) -> Vec<FileToDelete> {
    let cutoff = cutoff_date(today, minimum_age_months);

    deletable_sets(sets, customer.keep_count, cutoff)
        .flat_map(|set| {
            set.files.iter().map(|file| FileToDelete {
                customer_name: customer.folder_name.clone(),
                file_name: file.file_name.clone(),
                file_path: file.file_path.clone(),
                set_date: set.date,
                size: file.size,
            })
        })
        .collect()
}

/// Retention statistics over already-grouped sets. Safe to call repeatedly
/// as `keep_count` or `minimum_age_months` change, without re-scanning.
pub fn evaluate_stats(
    sets: &[BackupSet],
    keep_count: usize,
    minimum_age_months: u32,
    today: NaiveDate,
) -> CustomerStats {
    let cutoff = cutoff_date(today, minimum_age_months);

    let mut stats = CustomerStats {
        set_count: sets.len(),
        ..CustomerStats::default()
    };
    for set in deletable_sets(sets, keep_count, cutoff) {
        stats.files_to_delete += set.file_count();
        stats.bytes_to_free += set.total_size();
    }
    stats
}

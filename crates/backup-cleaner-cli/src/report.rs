use backup_cleaner_core::{DeletionOutcome, FileToDelete};
use colored::*;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

pub fn print_files(files: &[FileToDelete]) {
    let mut current_customer: Option<&str> = None;
    for file in files {
        if current_customer != Some(file.customer_name.as_str()) {
            println!("{}", file.customer_name.bold());
            current_customer = Some(file.customer_name.as_str());
        }
        println!(
            "  {}  {:>10}  {}",
            file.set_date,
            format_bytes(file.size),
            file.file_name
        );
    }

    let total_bytes: u64 = files.iter().map(|f| f.size).sum();
    println!(
        "{} files, {}",
        files.len().to_string().red(),
        format_bytes(total_bytes).red()
    );
}

pub fn print_outcome(outcome: &DeletionOutcome) {
    println!(
        "{} files deleted, {} freed",
        outcome.deleted_count.to_string().green(),
        format_bytes(outcome.freed_bytes).green()
    );
    if !outcome.errors.is_empty() {
        println!("{}:", format!("{} errors", outcome.errors.len()).red());
        for (path, message) in &outcome.errors {
            println!("  {}: {}", path.display(), message);
        }
    }
}

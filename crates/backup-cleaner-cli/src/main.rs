mod commands;
mod logging;
mod report;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::Result;
use backup_cleaner_core::{
    deletion, retention, AppConfig, CancelFlag, CleanupEngine, IgnoreMatcher, Settings,
};
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use tracing::error;

fn main() -> Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match backup_cleaner_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Scan) => {
            if let Err(err) = run_scan(&config) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Preview { customer }) => {
            if let Err(err) = run_preview(&config, customer.as_deref()) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Clean { yes }) => {
            if let Err(err) = run_clean(&config, yes) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Auto { force }) => {
            if let Err(err) = run_auto(&config, force) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Set {
            customer,
            keep,
            enable,
            disable,
        }) => {
            let enabled = if enable {
                Some(true)
            } else if disable {
                Some(false)
            } else {
                None
            };
            if let Err(err) = run_set(&config, &customer, enabled, keep) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::InitIgnore) => {
            if let Err(err) = run_init_ignore(&config) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_settings(config: &AppConfig) -> Result<Settings> {
    Ok(Settings::load(Path::new(&config.settings_file))?)
}

fn build_engine(config: &AppConfig) -> CleanupEngine {
    let ignore = IgnoreMatcher::load_or_init(Path::new(&config.ignore_file));
    CleanupEngine::new(config.backup_root.as_str(), ignore)
}

fn run_scan(config: &AppConfig) -> Result<()> {
    let settings = load_settings(config)?;
    let engine = build_engine(config);
    let outcome = engine.scan(&settings, &CancelFlag::new())?;
    let today = today();

    println!(
        "{:<30} {:>6} {:>10} {:>12}",
        "Customer".bold(),
        "Sets".bold(),
        "Eligible".bold(),
        "Reclaim".bold()
    );

    let mut files_total = 0usize;
    let mut bytes_total = 0u64;
    for scan in &outcome.customers {
        let stats = retention::evaluate_stats(
            &scan.sets,
            scan.customer.keep_count,
            settings.minimum_age_months,
            today,
        );
        files_total += stats.files_to_delete;
        bytes_total += stats.bytes_to_free;

        let mut name = scan.customer.folder_name.clone();
        if !scan.customer.configured {
            name.push_str(" (new)");
        } else if !scan.customer.enabled {
            name.push_str(" (disabled)");
        }
        println!(
            "{:<30} {:>6} {:>10} {:>12}",
            name,
            stats.set_count,
            stats.files_to_delete,
            report::format_bytes(stats.bytes_to_free)
        );
    }

    println!(
        "\n{} customers scanned in {}, {} files eligible, {} reclaimable",
        outcome.customers.len(),
        format!("{:.2}s", outcome.scan_duration.as_secs_f64()).green(),
        files_total.to_string().red(),
        report::format_bytes(bytes_total).red()
    );
    Ok(())
}

fn run_preview(config: &AppConfig, customer: Option<&str>) -> Result<()> {
    let settings = load_settings(config)?;
    let engine = build_engine(config);
    let outcome = engine.scan(&settings, &CancelFlag::new())?;
    let today = today();

    let files = match customer {
        // Explicit single-customer evaluation works even for disabled or
        // newly-discovered folders.
        Some(name) => {
            let Some(scan) = outcome
                .customers
                .iter()
                .find(|scan| scan.customer.folder_name == name)
            else {
                println!("No customer folder named '{}'", name);
                return Ok(());
            };
            retention::files_to_delete(
                &scan.customer,
                &scan.sets,
                settings.minimum_age_months,
                today,
            )
        }
        None => engine.preview(&outcome.customers, settings.minimum_age_months, today),
    };

    if files.is_empty() {
        println!("Nothing to delete.");
        return Ok(());
    }
    report::print_files(&files);
    Ok(())
}

fn run_clean(config: &AppConfig, yes: bool) -> Result<()> {
    let settings = load_settings(config)?;
    let engine = build_engine(config);
    let outcome = engine.scan(&settings, &CancelFlag::new())?;

    let files = engine.preview(&outcome.customers, settings.minimum_age_months, today());
    if files.is_empty() {
        println!("Nothing to delete.");
        return Ok(());
    }

    report::print_files(&files);
    if !yes {
        let total_bytes: u64 = files.iter().map(|f| f.size).sum();
        let confirmed = prompt_confirm(
            &format!(
                "Delete {} files ({})?",
                files.len(),
                report::format_bytes(total_bytes)
            ),
            Some(false),
        )?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let outcome = deletion::delete_files(&files);
    report::print_outcome(&outcome);
    Ok(())
}

fn run_auto(config: &AppConfig, force: bool) -> Result<()> {
    let mut settings = load_settings(config)?;

    if !settings.auto_cleanup_enabled && !force {
        println!("Automatic cleanup is disabled; use --force to run anyway.");
        return Ok(());
    }
    let today = today();
    if settings.last_auto_cleanup == Some(today) && !force {
        println!("Automatic cleanup already ran today.");
        return Ok(());
    }

    let engine = build_engine(config);
    let summary = engine.run_auto_cleanup(&settings, today)?;

    settings.last_auto_cleanup = Some(today);
    settings.save(Path::new(&config.settings_file))?;

    println!(
        "{} customers processed, {} files deleted, {} freed, {} errors",
        summary.customers_processed,
        summary.deleted_count.to_string().green(),
        report::format_bytes(summary.freed_bytes).green(),
        summary.errors.len().to_string().red()
    );
    for (path, message) in &summary.errors {
        println!("  {}: {}", path.display(), message);
    }
    if !summary.skipped_new.is_empty() {
        println!(
            "Skipped {} newly discovered folders (enable them with 'set'): {}",
            summary.skipped_new.len(),
            summary.skipped_new.join(", ")
        );
    }
    Ok(())
}

fn run_set(
    config: &AppConfig,
    customer: &str,
    enabled: Option<bool>,
    keep: Option<usize>,
) -> Result<()> {
    let mut settings = load_settings(config)?;
    let entry = settings.upsert_customer(customer, enabled, keep);
    let (enabled, keep_count) = (entry.enabled, entry.keep_count);
    settings.save(Path::new(&config.settings_file))?;

    println!(
        "{}: keep {} most recent sets, {}",
        customer.bold(),
        keep_count,
        if enabled {
            "included in batch cleanup".green()
        } else {
            "excluded from batch cleanup".yellow()
        }
    );
    Ok(())
}

fn run_init_ignore(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.ignore_file);
    if path.exists() {
        println!("Ignore file already exists at {}", path.display());
        return Ok(());
    }
    IgnoreMatcher::write_default_file(path)?;
    println!("Created default ignore file at {}", path.display());
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "backup-cleaner")]
#[command(about = "Retention-based cleanup for per-customer backup folders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan customer folders and show per-customer retention statistics
    Scan,
    /// List the files the current retention policy would delete
    Preview {
        /// Restrict the preview to a single customer folder
        #[arg(long)]
        customer: Option<String>,
    },
    /// Evaluate retention and delete eligible files after confirmation
    Clean {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Run the unattended cleanup pass for all enabled customers
    Auto {
        /// Run even if disabled or already run today
        #[arg(long)]
        force: bool,
    },
    /// Update retention settings for a customer folder
    Set {
        /// Customer folder name
        customer: String,
        /// Number of most recent backup sets to keep
        #[arg(long)]
        keep: Option<usize>,
        /// Include the customer in batch cleanup passes
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Exclude the customer from batch cleanup passes
        #[arg(long)]
        disable: bool,
    },
    /// Create the default ignore file if it does not exist
    InitIgnore,
    /// Print configuration values
    PrintConfig,
}

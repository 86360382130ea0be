pub mod config;
pub mod dates;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod models;
pub mod retention;
pub mod scanner;
pub mod settings;

pub use config::AppConfig;
pub use engine::{AutoCleanupReport, CancelFlag, CleanupEngine, CustomerScan, ScanOutcome};
pub use error::Error;
pub use ignore::IgnoreMatcher;
pub use models::{
    BackupFile, BackupSet, CustomerFolder, CustomerStats, DeletionOutcome, FileToDelete,
};
pub use settings::{CustomerSettings, Settings};

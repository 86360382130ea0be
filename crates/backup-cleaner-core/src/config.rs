use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

/// Application configuration: where the backup root and collaborator files
/// live. Read from an optional `Config` file plus `BACKUP_CLEANER_*`
/// environment overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backup_root: String,
    pub ignore_file: String,
    pub settings_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup_root: String::new(),
            ignore_file: "ignore.txt".to_string(),
            settings_file: "settings.json".to_string(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("BACKUP_CLEANER"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

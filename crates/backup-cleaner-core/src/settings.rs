use crate::error::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per-customer retention overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSettings {
    pub enabled: bool,
    pub keep_count: usize,
}

/// Retention configuration: global defaults plus per-customer overrides.
///
/// The evaluation pipeline consumes these values as plain parameters; only
/// the front end reads and writes the backing file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_keep_count: usize,
    pub minimum_age_months: u32,
    pub auto_cleanup_enabled: bool,
    /// Day the last unattended pass ran; gates the pass to once per day.
    pub last_auto_cleanup: Option<NaiveDate>,
    pub customers: HashMap<String, CustomerSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_keep_count: 5,
            minimum_age_months: 1,
            auto_cleanup_enabled: false,
            last_auto_cleanup: None,
            customers: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults; a
    /// malformed one is an explicit error for the caller to handle, never a
    /// silent reset.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write settings as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Insert or update a customer entry, starting from the defaults when
    /// the customer is new.
    pub fn upsert_customer(
        &mut self,
        name: &str,
        enabled: Option<bool>,
        keep_count: Option<usize>,
    ) -> &CustomerSettings {
        let entry = self
            .customers
            .entry(name.to_string())
            .or_insert(CustomerSettings {
                enabled: true,
                keep_count: self.default_keep_count,
            });
        if let Some(enabled) = enabled {
            entry.enabled = enabled;
        }
        if let Some(keep_count) = keep_count {
            entry.keep_count = keep_count;
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(settings.default_keep_count, 5);
        assert_eq!(settings.minimum_age_months, 1);
        assert!(!settings.auto_cleanup_enabled);
        assert!(settings.customers.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("conf").join("settings.json");

        let mut settings = Settings::default();
        settings.auto_cleanup_enabled = true;
        settings.last_auto_cleanup = NaiveDate::from_ymd_opt(2024, 6, 1);
        settings.upsert_customer("acme", Some(false), Some(3));
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.auto_cleanup_enabled);
        assert_eq!(loaded.last_auto_cleanup, NaiveDate::from_ymd_opt(2024, 6, 1));
        let acme = &loaded.customers["acme"];
        assert!(!acme.enabled);
        assert_eq!(acme.keep_count, 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "not json {").unwrap();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "default_keep_count": 7 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_keep_count, 7);
        assert_eq!(settings.minimum_age_months, 1);
    }

    #[test]
    fn upsert_starts_from_defaults() {
        let mut settings = Settings::default();
        settings.upsert_customer("globex", None, None);
        let globex = &settings.customers["globex"];
        assert!(globex.enabled);
        assert_eq!(globex.keep_count, settings.default_keep_count);
    }
}

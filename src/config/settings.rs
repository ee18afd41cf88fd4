//! User settings for Budget Master
//!
//! Display preferences, report defaults and the names shown for the two
//! household members.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::display::report::is_valid_date_format;
use crate::error::BudgetError;
use crate::models::Person;

/// Display names for the household members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    #[serde(default = "default_jeff")]
    pub jeff: String,
    #[serde(default = "default_vanessa")]
    pub vanessa: String,
}

impl Default for Household {
    fn default() -> Self {
        Self {
            jeff: default_jeff(),
            vanessa: default_vanessa(),
        }
    }
}

impl Household {
    /// Display name configured for a household member
    pub fn name_of(&self, person: Person) -> &str {
        match person {
            Person::Jeff => &self.jeff,
            Person::Vanessa => &self.vanessa,
        }
    }
}

/// User settings for Budget Master
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How many categories the monthly overview lists
    #[serde(default = "default_top_categories_limit")]
    pub top_categories_limit: usize,

    /// Default span of the trends report, in months
    #[serde(default = "default_trend_months")]
    pub trend_months: u32,

    #[serde(default)]
    pub household: Household,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_top_categories_limit() -> usize {
    5
}

fn default_trend_months() -> u32 {
    6
}

fn default_jeff() -> String {
    "Jeff".to_string()
}

fn default_vanessa() -> String {
    "Vanessa".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            top_categories_limit: default_top_categories_limit(),
            trend_months: default_trend_months(),
            household: Household::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Apply a `key = value` update from the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), BudgetError> {
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "date_format" => {
                if !is_valid_date_format(value) {
                    return Err(BudgetError::Validation(format!(
                        "Invalid date_format: {}",
                        value
                    )));
                }
                self.date_format = value.to_string();
            }
            "top_categories_limit" => {
                self.top_categories_limit = value.parse().map_err(|_| {
                    BudgetError::Validation(format!("Invalid top_categories_limit: {}", value))
                })?;
            }
            "trend_months" => {
                let months: u32 = value.parse().map_err(|_| {
                    BudgetError::Validation(format!("Invalid trend_months: {}", value))
                })?;
                if months == 0 {
                    return Err(BudgetError::Validation(
                        "trend_months must be at least 1".into(),
                    ));
                }
                self.trend_months = months;
            }
            "household.jeff" => self.household.jeff = value.to_string(),
            "household.vanessa" => self.household.vanessa = value.to_string(),
            other => {
                return Err(BudgetError::Config(format!("Unknown setting: {}", other)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.top_categories_limit, 5);
        assert_eq!(settings.household.name_of(Person::Vanessa), "Vanessa");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.trend_months = 12;
        settings.household.jeff = "Jeffrey".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.trend_months, 12);
        assert_eq!(loaded.household.name_of(Person::Jeff), "Jeffrey");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.trend_months, 6);
        assert_eq!(settings.household, Household::default());
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(settings.set("top_categories_limit", "8").is_ok());
        assert_eq!(settings.top_categories_limit, 8);
        assert!(settings.set("trend_months", "0").is_err());
        assert!(matches!(
            settings.set("encryption", "on"),
            Err(BudgetError::Config(_))
        ));
    }

    #[test]
    fn test_set_date_format() {
        let mut settings = Settings::default();
        settings.set("date_format", "%d/%m/%Y").unwrap();
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert!(matches!(
            settings.set("date_format", "%Q"),
            Err(BudgetError::Validation(_))
        ));
        assert_eq!(settings.date_format, "%d/%m/%Y");
    }
}

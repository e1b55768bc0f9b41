//! User settings
//!
//! Report defaults and housekeeping policy, persisted as config.json.

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::ExpenseError;
use crate::models::PeriodType;

/// User settings for the expense tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Period used when a report command isn't given one
    #[serde(default)]
    pub default_period_type: PeriodType,

    /// Number of periods per type in the rollup
    #[serde(default = "default_rollup_periods")]
    pub rollup_periods: usize,

    /// Transactions shown on the dashboard
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,

    /// Default row limit for transaction listings
    #[serde(default = "default_transaction_list_limit")]
    pub transaction_list_limit: usize,

    /// Transactions older than this many weeks before the start of the
    /// current month are pruned
    #[serde(default = "default_retention_weeks")]
    pub retention_weeks: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for terminal output (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_rollup_periods() -> usize {
    5
}

fn default_recent_transactions() -> usize {
    10
}

fn default_transaction_list_limit() -> usize {
    20
}

fn default_retention_weeks() -> u32 {
    18
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_period_type: PeriodType::default(),
            rollup_periods: default_rollup_periods(),
            recent_transactions: default_recent_transactions(),
            transaction_list_limit: default_transaction_list_limit(),
            retention_weeks: default_retention_weeks(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| ExpenseError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ExpenseError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

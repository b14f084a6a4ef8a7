//! # Till Configuration
//!
//! Shop settings: store identity, tax, tender warnings, report behaviour and
//! the database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NOODLE_TAX_RATE_BPS=1200                                           │
//! │     NOODLE_DB_PATH=/srv/noodle/noodle.db                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/noodle-money-buddy/till.toml (Linux)                     │
//! │     ~/Library/Application Support/com.noodle.money-buddy/till.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no tax, ₱, UTC, top 5 items, lenient dates                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # till.toml
//! [store]
//! name = "Aling Nena's Noodle House"
//! currency_symbol = "₱"
//!
//! [pricing]
//! tax_rate_bps = 1200  # 12.00%
//!
//! [payment]
//! overpayment_warning_multiplier = 10
//!
//! [statistics]
//! utc_offset_minutes = 480      # Asia/Manila
//! top_items_limit = 5
//! strict_dates = false          # true: malformed --from/--to is an error
//! group_items_by = "name"       # name | menu_item_id
//!
//! [database]
//! path = "/srv/noodle/noodle.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use noodle_core::money::DEFAULT_CURRENCY_SYMBOL;
use noodle_core::payment::DEFAULT_OVERPAYMENT_WARNING_MULTIPLIER;
use noodle_core::statistics::DEFAULT_TOP_ITEMS_LIMIT;
use noodle_core::validation::validate_tax_rate_bps;
use noodle_core::{ItemGrouping, PaymentProcessor, StatisticsAggregator, TaxRate};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "till.toml";
const DATABASE_FILE_NAME: &str = "noodle.db";

/// Largest UTC offset `chrono::FixedOffset` accepts, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

// =============================================================================
// Sections
// =============================================================================

/// Store identity shown in report headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Noodle Money Buddy".to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Tax applied to new orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Basis points, e.g. 1200 = 12%. Existing orders keep their own rate.
    #[serde(default)]
    pub tax_rate_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// A tender above this many times the amount due logs a warning.
    #[serde(default = "default_overpayment_multiplier")]
    pub overpayment_warning_multiplier: i64,
}

fn default_overpayment_multiplier() -> i64 {
    DEFAULT_OVERPAYMENT_WARNING_MULTIPLIER
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            overpayment_warning_multiplier: default_overpayment_multiplier(),
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Shop's offset from UTC; decides which calendar day an order falls on.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    #[serde(default = "default_top_items_limit")]
    pub top_items_limit: usize,

    /// Reject malformed `--from`/`--to` instead of treating them as open.
    #[serde(default)]
    pub strict_dates: bool,

    #[serde(default)]
    pub group_items_by: ItemGrouping,
}

fn default_top_items_limit() -> usize {
    DEFAULT_TOP_ITEMS_LIMIT
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            top_items_limit: default_top_items_limit(),
            strict_dates: false,
            group_items_by: ItemGrouping::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Till Config
// =============================================================================

/// Complete till configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TillConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub statistics: StatisticsConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl TillConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file if it exists
    /// 3. Override with `NOODLE_*` environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading till config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Till config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(AppError::config("store.name must not be empty"));
        }

        if self.store.currency_symbol.trim().is_empty() {
            return Err(AppError::config("store.currency_symbol must not be empty"));
        }

        validate_tax_rate_bps(self.pricing.tax_rate_bps)
            .map_err(|e| AppError::config(format!("pricing: {}", e)))?;

        if self.payment.overpayment_warning_multiplier < 1 {
            return Err(AppError::config(
                "payment.overpayment_warning_multiplier must be at least 1",
            ));
        }

        if self.statistics.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::config(format!(
                "statistics.utc_offset_minutes must be between -{max} and {max}",
                max = MAX_UTC_OFFSET_MINUTES
            )));
        }

        if self.statistics.top_items_limit == 0 {
            return Err(AppError::config(
                "statistics.top_items_limit must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `NOODLE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Database path
        if let Some(path) = lookup("NOODLE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        // Tax rate
        if let Some(bps) = lookup("NOODLE_TAX_RATE_BPS") {
            match bps.trim().parse::<u32>() {
                Ok(parsed) => {
                    debug!(tax_rate_bps = parsed, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = parsed;
                }
                Err(_) => warn!(value = %bps, "Ignoring unparseable NOODLE_TAX_RATE_BPS"),
            }
        }

        // Store identity
        if let Some(name) = lookup("NOODLE_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("NOODLE_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        // UTC offset
        if let Some(offset) = lookup("NOODLE_UTC_OFFSET_MINUTES") {
            match offset.trim().parse::<i32>() {
                Ok(parsed) => self.statistics.utc_offset_minutes = parsed,
                Err(_) => warn!(value = %offset, "Ignoring unparseable NOODLE_UTC_OFFSET_MINUTES"),
            }
        }

        // Strict dates
        if let Some(strict) = lookup("NOODLE_STRICT_DATES") {
            match strict.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.statistics.strict_dates = true,
                "0" | "false" | "no" | "off" => self.statistics.strict_dates = false,
                _ => warn!(value = %strict, "Unknown NOODLE_STRICT_DATES value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "noodle", "money-buddy")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolves the SQLite file, creating the data directory when defaulted.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "noodle", "money-buddy")
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        let data_dir: &Path = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pricing.tax_rate_bps)
    }

    pub fn payment_processor(&self) -> PaymentProcessor {
        PaymentProcessor::new(self.payment.overpayment_warning_multiplier)
    }

    pub fn statistics_aggregator(&self) -> StatisticsAggregator {
        StatisticsAggregator::new(self.statistics.utc_offset_minutes)
            .with_top_limit(self.statistics.top_items_limit)
            .with_grouping(self.statistics.group_items_by)
    }
}

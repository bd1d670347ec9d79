//! Application configuration loaded from TOML.
//!
//! Every key is optional:
//!
//! ```toml
//! gross_goal = "1000"
//! lock_fees = true
//! log_level = "info"
//!
//! [fees]
//! ebay_fee_pct = "0.13"
//! promoted_pct = "0"
//! payment_proc_pct = "0.029"
//! payment_proc_fixed = "0.30"
//! refunds_pct = "0"
//! ```
//!
//! Rates are best written as quoted strings so they load as exact decimals.

use std::path::{Path, PathBuf};

use profit_core::{CalcInput, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid fee profile: {0}")]
    InvalidFees(#[from] ValidationError),

    #[error("gross goal must be non-negative, got {0}")]
    NegativeGoal(Decimal),
}

/// Default fee rates applied to a new sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeProfile {
    pub ebay_fee_pct: Decimal,
    pub promoted_pct: Decimal,
    pub payment_proc_pct: Decimal,
    pub payment_proc_fixed: Decimal,
    pub refunds_pct: Decimal,
}

impl Default for FeeProfile {
    /// 13% final value fee, no promotion, 2.9% + 0.30 processing, no refunds.
    fn default() -> Self {
        Self {
            ebay_fee_pct: Decimal::new(13, 2),
            promoted_pct: Decimal::ZERO,
            payment_proc_pct: Decimal::new(29, 3),
            payment_proc_fixed: Decimal::new(30, 2),
            refunds_pct: Decimal::ZERO,
        }
    }
}

impl FeeProfile {
    /// Copies the profile's rates onto `input`, leaving every other field alone.
    pub fn apply_to(
        &self,
        input: &mut CalcInput,
    ) {
        input.ebay_fee_pct = self.ebay_fee_pct;
        input.promoted_pct = self.promoted_pct;
        input.payment_proc_pct = self.payment_proc_pct;
        input.payment_proc_fixed = self.payment_proc_fixed;
        input.refunds_pct = self.refunds_pct;
    }

    /// Checks the rates with the same rules the calculator uses.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut input = CalcInput::default();
        self.apply_to(&mut input);
        input.validate()
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gross sales target tracked across logged items.
    pub gross_goal: Decimal,
    /// Keep fee rates, taxes and adjustments when clearing for the next item.
    pub lock_fees: bool,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub fees: FeeProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gross_goal: Decimal::new(1000, 0),
            lock_fees: true,
            log_level: "info".to_string(),
            fees: FeeProfile::default(),
        }
    }
}

impl AppConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Parse`] if the text is not valid TOML for this layout.
    /// * [`ConfigError::InvalidFees`] if a fee rate breaks a calculator rule.
    /// * [`ConfigError::NegativeGoal`] if `gross_goal` is below zero.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path` and delegates to [`AppConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gross_goal < Decimal::ZERO {
            return Err(ConfigError::NegativeGoal(self.gross_goal));
        }
        self.fees.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use profit_core::InputField;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_profile_matches_standard_rates() {
        let fees = FeeProfile::default();

        assert_eq!(fees.ebay_fee_pct, dec!(0.13));
        assert_eq!(fees.promoted_pct, dec!(0));
        assert_eq!(fees.payment_proc_pct, dec!(0.029));
        assert_eq!(fees.payment_proc_fixed, dec!(0.30));
        assert_eq!(fees.refunds_pct, dec!(0));
        assert_eq!(fees.validate(), Ok(()));
    }

    #[test]
    fn apply_to_only_touches_rates() {
        let mut input = CalcInput {
            item_price: dec!(45),
            taxes: dec!(3),
            ..CalcInput::default()
        };

        FeeProfile::default().apply_to(&mut input);

        assert_eq!(input.item_price, dec!(45));
        assert_eq!(input.taxes, dec!(3));
        assert_eq!(input.ebay_fee_pct, dec!(0.13));
        assert_eq!(input.payment_proc_fixed, dec!(0.30));
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_fees_table_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            gross_goal = "2500.50"
            lock_fees = false

            [fees]
            promoted_pct = "0.08"
            "#,
        )
        .unwrap();

        assert_eq!(config.gross_goal, dec!(2500.50));
        assert!(!config.lock_fees);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.fees.promoted_pct, dec!(0.08));
        assert_eq!(config.fees.ebay_fee_pct, dec!(0.13));
    }

    #[test]
    fn rejects_refunds_rate_above_one() {
        let result = AppConfig::from_toml_str("[fees]\nrefunds_pct = \"1.5\"\n");

        match result {
            Err(ConfigError::InvalidFees(error)) => {
                assert!(error.has_field(InputField::RefundsPct));
            }
            other => panic!("expected InvalidFees, got {:?}", other),
        }
    }

    #[test]
    fn rejects_negative_goal() {
        let result = AppConfig::from_toml_str("gross_goal = \"-1\"\n");

        assert!(matches!(result, Err(ConfigError::NegativeGoal(goal)) if goal == dec!(-1)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = AppConfig::from_toml_str("gross_goal = [");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = AppConfig::load(Path::new("does/not/exist.toml"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}

//! Settlement configuration

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{CoreError, Currency};
use crate::policy::{EmptySplitPolicy, FallbackPayer, RosterPolicy};

/// Settlement configuration
///
/// The settlement tolerance is not configurable. It is fixed at
/// [`core_kernel::SETTLEMENT_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Currency assumed for snapshots that do not carry one
    pub currency: Currency,
    /// Who inherits a removed person's expenses
    pub fallback_payer: FallbackPayer,
    /// What happens to expenses nobody is left to split
    pub empty_split_policy: EmptySplitPolicy,
    /// Tracing filter directive, e.g. `info` or `domain_settlement=debug`
    pub log_level: String,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            fallback_payer: FallbackPayer::default(),
            empty_split_policy: EmptySplitPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl SettlementConfig {
    /// Loads configuration from `SETTLEMENT_*` environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::with_prefix("SETTLEMENT"))
    }

    /// Loads configuration from an explicit environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, CoreError> {
        config::Config::builder()
            .add_source(environment)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))
    }

    /// Tracing filter built from `log_level`
    pub fn log_filter(&self) -> Result<EnvFilter, CoreError> {
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            CoreError::configuration(format!("invalid log level {:?}: {}", self.log_level, e))
        })
    }

    /// Installs the global tracing subscriber
    ///
    /// `RUST_LOG` takes precedence over `log_level` when set.
    ///
    /// # Errors
    ///
    /// - Returns error if `log_level` is not a valid filter directive
    /// - Returns error if a global subscriber is already installed
    pub fn init_tracing(&self) -> Result<(), CoreError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => self.log_filter()?,
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| CoreError::configuration(e.to_string()))
    }

    /// Roster policy described by this configuration
    pub fn roster_policy(&self) -> RosterPolicy {
        RosterPolicy::new(self.fallback_payer, self.empty_split_policy)
    }
}

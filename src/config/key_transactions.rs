use crate::domain::model::{ApdexTargets, KeyTransaction};
use crate::utils::error::{OpsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Train-Ticket services and the transaction each one is scored on.
///
/// The names are best guesses until the services report to APM; override them
/// with a `--config` file once the real names are visible.
pub const DEFAULT_KEY_TRANSACTIONS: [(&str, &str); 6] = [
    (
        "store-ts-auth-service",
        "WebTransaction/SpringController/AuthController/verifyToken",
    ),
    (
        "store-ts-order-service",
        "WebTransaction/SpringController/OrderController/createNewOrder",
    ),
    (
        "store-ts-preserve-service",
        "WebTransaction/SpringController/PreserveController/preserve",
    ),
    (
        "store-ts-payment-service",
        "WebTransaction/SpringController/PaymentController/pay",
    ),
    (
        "store-ts-travel-service",
        "WebTransaction/SpringController/TravelController/queryAll",
    ),
    ("store-ts-ui-dashboard", "WebTransaction/Uri/index.html"),
];

pub fn default_key_transactions() -> Vec<KeyTransaction> {
    DEFAULT_KEY_TRANSACTIONS
        .iter()
        .map(|(service, name)| KeyTransaction::new(*service, *name))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyTransactionsFile {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub apdex: ApdexTargets,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default = "default_key_transactions")]
    pub transactions: Vec<KeyTransaction>,
}

impl Default for KeyTransactionsFile {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: None,
            apdex: ApdexTargets::default(),
            retry: RetryConfig::default(),
            transactions: default_key_transactions(),
        }
    }
}

impl KeyTransactionsFile {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OpsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = super::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| OpsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for KeyTransactionsFile {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validation::validate_url("endpoint", endpoint)?;
        }

        validation::validate_positive_number("transactions", self.transactions.len(), 1)?;
        for txn in &self.transactions {
            validation::validate_non_empty_string("transactions.service", &txn.service)?;
            validation::validate_non_empty_string("transactions.name", &txn.name)?;
        }
        validation::validate_unique(
            "transactions.service",
            self.transactions.iter().map(|t| t.service.as_str()),
        )?;

        validation::validate_positive_number(
            "retry.max_attempts",
            self.retry.max_attempts as usize,
            1,
        )?;
        validation::validate_range("apdex.target", self.apdex.target, 0.0, 1000.0)?;
        validation::validate_range(
            "apdex.browser_target",
            self.apdex.browser_target,
            0.0,
            1000.0,
        )?;

        Ok(())
    }
}

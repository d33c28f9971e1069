pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "loadgen")]
pub mod loadgen;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::NerdGraphClient;
pub use config::{KeyTransactionsFile, MonitoringEnv, Region};
pub use core::KeyTransactionSetup;
pub use utils::error::{OpsError, Result};

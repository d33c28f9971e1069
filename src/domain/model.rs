use serde::{Deserialize, Serialize};
use std::fmt;

/// A service whose named transaction should be tracked as a key transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTransaction {
    pub service: String,
    pub name: String,
}

impl KeyTransaction {
    pub fn new(service: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            name: name.into(),
        }
    }
}

/// Vendor-assigned identifier of a monitored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityGuid(pub String);

impl EntityGuid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApdexTargets {
    #[serde(default = "default_apdex_target")]
    pub target: f64,
    #[serde(default = "default_browser_apdex_target")]
    pub browser_target: f64,
}

fn default_apdex_target() -> f64 {
    0.5
}

fn default_browser_apdex_target() -> f64 {
    7.0
}

impl Default for ApdexTargets {
    fn default() -> Self {
        Self {
            target: default_apdex_target(),
            browser_target: default_browser_apdex_target(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyTransactionRequest {
    pub application_guid: EntityGuid,
    pub metric_name: String,
    pub apdex: ApdexTargets,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedKeyTransaction {
    pub guid: Option<EntityGuid>,
    pub name: Option<String>,
    pub metric_name: Option<String>,
    pub apdex_target: Option<f64>,
    pub browser_apdex_target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupReport {
    pub completed: usize,
    pub total: usize,
    pub rounds: u32,
    pub created: Vec<String>,
    pub already_present: Vec<String>,
    pub last_error: Option<String>,
}

impl SetupReport {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    pub fn into_result(self) -> crate::utils::error::Result<SetupReport> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(crate::utils::error::OpsError::RetryBudgetExhausted {
                completed: self.completed,
                total: self.total,
                rounds: self.rounds,
            })
        }
    }
}

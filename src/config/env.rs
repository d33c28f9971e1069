use crate::utils::error::{OpsError, Result};

pub const REGION_VAR: &str = "TF_VAR_NEW_RELIC_REGION";
pub const API_KEY_VAR: &str = "TF_VAR_NEW_RELIC_API_KEY";
pub const ACCOUNT_ID_VAR: &str = "TF_VAR_NEW_RELIC_ACCOUNT_ID";

pub const US_ENDPOINT: &str = "https://api.newrelic.com/graphql";
pub const EU_ENDPOINT: &str = "https://api.eu.newrelic.com/graphql";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// Only the exact value `EU` selects the EU datacenter.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("EU") => Region::Eu,
            _ => Region::Us,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Region::Us => US_ENDPOINT,
            Region::Eu => EU_ENDPOINT,
        }
    }
}

/// Credentials and region read from the Terraform-style environment.
#[derive(Clone)]
pub struct MonitoringEnv {
    pub region: Region,
    pub api_key: String,
    pub account_id: String,
}

impl std::fmt::Debug for MonitoringEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringEnv")
            .field("region", &self.region)
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl MonitoringEnv {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = Region::from_env_value(lookup(REGION_VAR).as_deref());

        let api_key = lookup(API_KEY_VAR).ok_or_else(|| OpsError::MissingEnvVar {
            var: API_KEY_VAR.to_string(),
            message: format!(
                "No USER api key found in environment variable {}",
                API_KEY_VAR
            ),
        })?;

        let account_id = lookup(ACCOUNT_ID_VAR).ok_or_else(|| OpsError::MissingEnvVar {
            var: ACCOUNT_ID_VAR.to_string(),
            message: format!("No ACCOUNT ID found in environment variable {}", ACCOUNT_ID_VAR),
        })?;

        Ok(Self {
            region,
            api_key,
            account_id,
        })
    }
}

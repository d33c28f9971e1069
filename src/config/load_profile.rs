use crate::utils::error::{OpsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const PROFILE_PATH_VAR: &str = "TT_LOAD_PROFILE";
pub const VARIANT_VAR: &str = "TT_LOAD_VARIANT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Sample data and pacing for simulated Train-Ticket users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadProfile {
    /// Used when goose is started without `--host`.
    pub host: Option<String>,
    pub stations: Vec<String>,
    pub train_types: Vec<String>,
    /// 0=None, 1=Business, 2=First, 3=Second
    pub seat_types: Vec<i32>,
    pub users: Vec<Credentials>,
    pub verification_code: String,
    pub departure_date: String,
    pub config_name: String,
    pub wait_min_secs: u64,
    pub wait_max_secs: u64,
}

impl Default for LoadProfile {
    fn default() -> Self {
        let stations = [
            "shanghai",
            "beijing",
            "nanjing",
            "suzhou",
            "taiyuan",
            "shijiazhuang",
            "zhuzhou",
            "jinan",
            "xuzhou",
            "jiaxing",
        ];
        Self {
            host: None,
            stations: stations.iter().map(|s| s.to_string()).collect(),
            train_types: ["G", "D", "K", "T", "Z"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seat_types: vec![2, 3],
            // Only fdse_microservice exists in a fresh Train-Ticket database.
            users: vec![Credentials {
                username: "fdse_microservice".to_string(),
                password: "111111".to_string(),
            }],
            verification_code: "1234".to_string(),
            departure_date: "2024-12-25".to_string(),
            config_name: "DirectTicketAllocationProportion".to_string(),
            wait_min_secs: 1,
            wait_max_secs: 10,
        }
    }
}

impl LoadProfile {
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

    pub fn wait_time(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.wait_min_secs),
            Duration::from_secs(self.wait_max_secs),
        )
    }
}

impl Validate for LoadProfile {
    fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host {
            validation::validate_url("host", host)?;
        }
        // A trip needs two distinct stations.
        validation::validate_positive_number("stations", self.stations.len(), 2)?;
        validation::validate_unique("stations", self.stations.iter().map(String::as_str))?;
        validation::validate_positive_number("train_types", self.train_types.len(), 1)?;
        validation::validate_positive_number("seat_types", self.seat_types.len(), 1)?;
        validation::validate_positive_number("users", self.users.len(), 1)?;
        for user in &self.users {
            validation::validate_non_empty_string("users.username", &user.username)?;
        }
        validation::validate_non_empty_string("departure_date", &self.departure_date)?;
        validation::validate_range(
            "wait_min_secs",
            self.wait_min_secs,
            0,
            self.wait_max_secs,
        )?;
        Ok(())
    }
}

/// Which task mix the simulated users run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileVariant {
    /// Searching and browsing only.
    #[default]
    Browse,
    /// Browsing plus seat lookup, booking, payment and cancellation.
    Booking,
}

impl FromStr for ProfileVariant {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browse" => Ok(ProfileVariant::Browse),
            "booking" => Ok(ProfileVariant::Booking),
            other => Err(OpsError::InvalidConfigValueError {
                field: VARIANT_VAR.to_string(),
                value: other.to_string(),
                reason: "Expected 'browse' or 'booking'".to_string(),
            }),
        }
    }
}

/// Load generator settings; goose keeps the command line for itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadgenSettings {
    pub profile: LoadProfile,
    pub variant: ProfileVariant,
}

impl LoadgenSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match lookup(PROFILE_PATH_VAR) {
            Some(path) => LoadProfile::from_file(path)?,
            None => LoadProfile::default(),
        };
        profile.validate()?;

        let variant = match lookup(VARIANT_VAR) {
            Some(value) => value.parse()?,
            None => ProfileVariant::default(),
        };

        Ok(Self { profile, variant })
    }
}

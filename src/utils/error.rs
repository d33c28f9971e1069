use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("NerdGraph query failed with a {status}.")]
    UnexpectedStatus { status: u16 },

    #[error("NerdGraph returned errors: {message}")]
    GraphQlError { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("No monitored entity named '{name}' was found")]
    EntityNotFound { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Error: {message}")]
    MissingEnvVar { var: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create key transactions after {rounds} attempts ({completed} of {total} done)")]
    RetryBudgetExhausted {
        completed: usize,
        total: usize,
        rounds: u32,
    },

    #[cfg(feature = "loadgen")]
    #[error("Load test failed: {0}")]
    LoadTestError(#[from] goose::GooseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Api,
    Data,
    System,
}

impl OpsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OpsError::MissingEnvVar { .. }
            | OpsError::ConfigError { .. }
            | OpsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            OpsError::ApiError(_) => ErrorCategory::Network,
            OpsError::UnexpectedStatus { .. }
            | OpsError::GraphQlError { .. }
            | OpsError::EntityNotFound { .. }
            | OpsError::RetryBudgetExhausted { .. } => ErrorCategory::Api,
            OpsError::MalformedResponse { .. } | OpsError::SerializationError(_) => {
                ErrorCategory::Data
            }
            OpsError::IoError(_) => ErrorCategory::System,
            #[cfg(feature = "loadgen")]
            OpsError::LoadTestError(_) => ErrorCategory::System,
        }
    }

    /// Whether another setup round may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Api | ErrorCategory::Data
        ) && !matches!(self, OpsError::RetryBudgetExhausted { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            OpsError::MissingEnvVar { message, .. } => format!("Error: {}", message),
            OpsError::RetryBudgetExhausted {
                completed, total, ..
            } => format!(
                "Successfully created {} out of {} transactions.",
                completed, total
            ),
            OpsError::EntityNotFound { name } => {
                format!("New Relic has no entity named '{}' yet", name)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OpsError::MissingEnvVar { .. } => {
                "Export TF_VAR_NEW_RELIC_API_KEY and TF_VAR_NEW_RELIC_ACCOUNT_ID before running"
            }
            OpsError::ConfigError { .. } | OpsError::InvalidConfigValueError { .. } => {
                "Check the configuration file and command line flags"
            }
            OpsError::ApiError(_) => "Check network connectivity to the NerdGraph endpoint",
            OpsError::UnexpectedStatus { .. } | OpsError::GraphQlError { .. } => {
                "Check that the API key is a USER key for the selected region"
            }
            OpsError::EntityNotFound { .. } | OpsError::RetryBudgetExhausted { .. } => {
                "Wait for all services to be running and instrumented, then re-run"
            }
            OpsError::MalformedResponse { .. } | OpsError::SerializationError(_) => {
                "The API response shape changed; re-run with --verbose to inspect it"
            }
            OpsError::IoError(_) => "Check file paths and permissions",
            #[cfg(feature = "loadgen")]
            OpsError::LoadTestError(_) => "Check the goose command line options",
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, OpsError>;

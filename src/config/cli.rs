use crate::config::key_transactions::KeyTransactionsFile;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "trainticket-ops")]
#[command(about = "Create New Relic key transactions for the Train-Ticket services")]
pub struct CliConfig {
    /// TOML file with the key transaction table, apdex targets and retry policy
    #[arg(short, long)]
    pub config: Option<String>,

    /// NerdGraph endpoint; defaults to the URL for TF_VAR_NEW_RELIC_REGION
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Pause between failed rounds
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Per-request timeout; requests never time out when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Show the work list without calling NerdGraph
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Loads the TOML file (or the built-in table) and applies flag overrides.
    pub fn resolve(&self) -> Result<KeyTransactionsFile> {
        let mut file = match &self.config {
            Some(path) => KeyTransactionsFile::from_file(path)?,
            None => KeyTransactionsFile::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            file.endpoint = Some(endpoint.clone());
        }
        if let Some(max_attempts) = self.max_attempts {
            file.retry.max_attempts = max_attempts;
        }
        if let Some(delay_ms) = self.retry_delay_ms {
            file.retry.delay_ms = delay_ms;
        }
        if let Some(timeout) = self.timeout_seconds {
            file.timeout_seconds = Some(timeout);
        }

        file.validate()?;
        Ok(file)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validation::validate_url("--endpoint", endpoint)?;
        }
        if let Some(max_attempts) = self.max_attempts {
            validation::validate_positive_number("--max-attempts", max_attempts as usize, 1)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("--timeout-seconds", timeout as usize, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["trainticket-ops"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.log_format, LogFormat::Compact);

        let resolved = cli.resolve().unwrap();
        assert_eq!(resolved.transactions.len(), 6);
        assert_eq!(resolved.retry.max_attempts, 20);
        assert_eq!(resolved.retry.delay_ms, 1000);
        assert!(resolved.endpoint.is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"endpoint = \"https://example.com/graphql\"\n[retry]\nmax_attempts = 5\ndelay_ms = 500\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "trainticket-ops",
            "--config",
            &path,
            "--endpoint",
            "http://localhost:1234/graphql",
            "--retry-delay-ms",
            "0",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.log_format, LogFormat::Json);

        let resolved = cli.resolve().unwrap();
        assert_eq!(
            resolved.endpoint.as_deref(),
            Some("http://localhost:1234/graphql")
        );
        assert_eq!(resolved.retry.max_attempts, 5);
        assert_eq!(resolved.retry.delay_ms, 0);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = CliConfig::parse_from(["trainticket-ops", "--endpoint", "not a url"]);
        assert!(cli.validate().is_err());

        let cli = CliConfig::parse_from(["trainticket-ops", "--max-attempts", "0"]);
        assert!(cli.validate().is_err());
        assert!(cli.resolve().is_err());
    }
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod key_transactions;
#[cfg(feature = "loadgen")]
pub mod load_profile;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use env::{MonitoringEnv, Region};
pub use key_transactions::{KeyTransactionsFile, RetryConfig};

use regex::Regex;
use std::sync::OnceLock;

/// 替換環境變數 (例如 ${API_KEY})；未設定的變數保持原樣
pub(crate) fn substitute_env_vars(content: &str) -> String {
    substitute_vars(content, |name| std::env::var(name).ok())
}

pub(crate) fn substitute_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    })
    .into_owned()
}

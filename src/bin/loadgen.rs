//! Train-Ticket load generator.
//!
//! Command line options belong to goose (`--host`, `-u`, `-r`, `-t`, ...).
//! The profile is chosen with environment variables:
//!
//! - `TT_LOAD_PROFILE`: TOML file overriding the sample data and pacing
//! - `TT_LOAD_VARIANT`: `browse` (default) or `booking`

use trainticket_ops::config::load_profile::LoadgenSettings;
use trainticket_ops::loadgen::run_load_test;
use trainticket_ops::utils::logger;

#[tokio::main]
async fn main() {
    logger::init_cli_logger(false);

    let settings = match LoadgenSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Load profile is invalid: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match run_load_test(settings).await {
        Ok(_metrics) => tracing::info!("✅ Load test finished"),
        Err(e) => {
            tracing::error!("❌ Load test failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

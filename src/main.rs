use clap::Parser;
use std::time::Duration;
use trainticket_ops::config::LogFormat;
use trainticket_ops::utils::{logger, validation::Validate};
use trainticket_ops::{CliConfig, KeyTransactionSetup, MonitoringEnv, NerdGraphClient, OpsError};

fn fail(e: &OpsError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}) - {}",
        e,
        e.category(),
        e.recovery_suggestion()
    );
    eprintln!("{}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let env = match MonitoringEnv::from_env() {
        Ok(env) => env,
        Err(e) => fail(&e),
    };

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    let endpoint = settings
        .endpoint
        .clone()
        .unwrap_or_else(|| env.region.endpoint().to_string());
    let client = match settings.timeout_seconds {
        Some(secs) => {
            match NerdGraphClient::with_timeout(&endpoint, &env.api_key, Duration::from_secs(secs))
            {
                Ok(client) => client,
                Err(e) => fail(&e),
            }
        }
        None => NerdGraphClient::new(&endpoint, &env.api_key),
    };
    tracing::debug!(
        "Using NerdGraph endpoint {} ({:?})",
        client.endpoint(),
        env.region
    );

    let total = settings.transactions.len();
    let setup = KeyTransactionSetup::new(client, env.account_id.clone(), settings.transactions)
        .with_apdex(settings.apdex)
        .with_retry(settings.retry);

    println!("Setting up {} key transactions for Train-Ticket services...", total);
    println!("Note: If services are not yet instrumented or transaction names are incorrect,");
    println!("      this process may fail. You can re-run this tool after services are running.\n");

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - NerdGraph will not be called");
        for (service, name) in setup.plan() {
            println!("  - {} -> {}", service, name);
        }
        return;
    }

    let report = setup.run().await;

    if report.is_complete() {
        println!(
            "\nAll {} key transactions created successfully.",
            report.total
        );
        return;
    }

    println!(
        "\nFailed to create key transactions after {} attempts.",
        report.rounds
    );
    println!(
        "Successfully created {} out of {} transactions.",
        report.completed, report.total
    );
    if let Some(last_error) = &report.last_error {
        println!("Last error: {}", last_error);
    }
    println!("\nThis is normal if:");
    println!("  1. Services are not yet fully deployed and instrumented");
    println!("  2. Transaction names don't match actual transaction names in New Relic");
    println!("\nYou can:");
    println!("  1. Wait for all services to be running and instrumented");
    println!("  2. Check New Relic APM for actual transaction names");
    println!("  3. Put the real names in a TOML file and pass it with --config");
    println!("  4. Re-run this tool");

    if let Err(e) = report.into_result() {
        tracing::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

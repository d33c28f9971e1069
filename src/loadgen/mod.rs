//! Weighted Train-Ticket user behaviour for goose.
//!
//! goose owns scheduling, user spawning and statistics. This module only
//! declares which actions a simulated user performs and how often.

pub mod sampling;
pub mod session;
pub mod transactions;

use crate::config::load_profile::{LoadProfile, LoadgenSettings, ProfileVariant};
use crate::utils::error::Result;
use goose::metrics::GooseMetrics;
use goose::prelude::*;
use std::sync::Arc;

pub use session::TrainTicketSession;

pub const SCENARIO_NAME: &str = "TrainTicketUser";
pub const LOGIN_TRANSACTION: &str = "Login";

/// Transaction names and relative weights shared by both variants.
pub const BROWSE_WEIGHTS: [(&str, usize); 7] = [
    ("Search Tickets", 20),
    ("Query High-Speed Tickets", 10),
    ("Check Station", 5),
    ("View Contacts", 3),
    ("Query Train Info", 3),
    ("View Orders", 2),
    ("Check Config", 2),
];

/// Extra transactions of the booking variant.
pub const BOOKING_WEIGHTS: [(&str, usize); 4] = [
    ("Check Seats", 2),
    ("Book Ticket", 2),
    ("Pay Order", 1),
    ("Cancel Order", 1),
];

/// Wraps a `fn(&mut GooseUser, &LoadProfile)` transaction in a goose closure.
macro_rules! with_profile {
    ($profile:expr, $func:path) => {{
        let profile: Arc<LoadProfile> = Arc::clone(&$profile);
        let function: TransactionFunction = Arc::new(move |user| {
            let profile = Arc::clone(&profile);
            Box::pin(async move { $func(user, &profile).await })
        });
        function
    }};
}

fn transaction_function(profile: &Arc<LoadProfile>, name: &str) -> Option<TransactionFunction> {
    let function = match name {
        "Search Tickets" => with_profile!(profile, transactions::search_tickets),
        "Query High-Speed Tickets" => {
            with_profile!(profile, transactions::query_high_speed_tickets)
        }
        "Check Station" => with_profile!(profile, transactions::check_station_info),
        "View Contacts" => with_profile!(profile, transactions::view_contacts),
        "Query Train Info" => with_profile!(profile, transactions::query_train_info),
        "View Orders" => with_profile!(profile, transactions::view_orders),
        "Check Config" => with_profile!(profile, transactions::check_config),
        "Check Seats" => with_profile!(profile, transactions::check_seats),
        "Book Ticket" => with_profile!(profile, transactions::book_ticket),
        "Pay Order" => with_profile!(profile, transactions::pay_order),
        "Cancel Order" => with_profile!(profile, transactions::cancel_order),
        _ => return None,
    };
    Some(function)
}

/// Weighted transactions of a variant, in registration order.
pub fn weights(variant: ProfileVariant) -> Vec<(&'static str, usize)> {
    let mut weights = BROWSE_WEIGHTS.to_vec();
    if variant == ProfileVariant::Booking {
        weights.extend_from_slice(&BOOKING_WEIGHTS);
    }
    weights
}

pub fn build_scenario(
    profile: Arc<LoadProfile>,
    variant: ProfileVariant,
) -> std::result::Result<Scenario, GooseError> {
    let (min_wait, max_wait) = profile.wait_time();

    let login = Transaction::new(with_profile!(profile, transactions::login))
        .set_name(LOGIN_TRANSACTION)
        .set_on_start();

    let mut scenario = scenario!(SCENARIO_NAME)
        .set_wait_time(min_wait, max_wait)?
        .register_transaction(login);

    for (name, weight) in weights(variant) {
        if let Some(function) = transaction_function(&profile, name) {
            let transaction = Transaction::new(function)
                .set_name(name)
                .set_weight(weight)?;
            scenario = scenario.register_transaction(transaction);
        }
    }

    Ok(scenario)
}

pub async fn run_load_test(settings: LoadgenSettings) -> Result<GooseMetrics> {
    let profile = Arc::new(settings.profile);
    tracing::info!(
        "Starting {:?} load profile with {} stations and {} users",
        settings.variant,
        profile.stations.len(),
        profile.users.len()
    );

    let scenario = build_scenario(Arc::clone(&profile), settings.variant)?;

    // goose reads its own command line (users, hatch rate, run time, --host).
    let attack = GooseAttack::initialize()?;
    let metrics = match &profile.host {
        Some(host) => {
            attack
                .set_default(GooseDefault::Host, host.as_str())?
                .register_scenario(scenario)
                .execute()
                .await?
        }
        None => attack.register_scenario(scenario).execute().await?,
    };
    Ok(metrics)
}

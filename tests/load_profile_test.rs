#![cfg(feature = "loadgen")]

use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use trainticket_ops::config::load_profile::{
    LoadgenSettings, ProfileVariant, PROFILE_PATH_VAR, VARIANT_VAR,
};
use trainticket_ops::loadgen::{build_scenario, LOGIN_TRANSACTION};
use trainticket_ops::OpsError;

fn profile_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_booking_profile_from_file() {
    let file = profile_file(
        r#"
host = "http://train-ticket.local:8080"
stations = ["shanghai", "suzhou", "nanjing"]
wait_min_secs = 0
wait_max_secs = 2

[[users]]
username = "fdse_microservice"
password = "111111"
"#,
    );
    let path = file.path().to_string_lossy().to_string();

    let settings = LoadgenSettings::from_lookup(|name| match name {
        PROFILE_PATH_VAR => Some(path.clone()),
        VARIANT_VAR => Some("Booking".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(settings.variant, ProfileVariant::Booking);
    assert_eq!(settings.profile.stations.len(), 3);
    assert_eq!(settings.profile.seat_types, vec![2, 3]);

    let scenario = build_scenario(Arc::new(settings.profile), settings.variant).unwrap();
    assert_eq!(scenario.transactions.len(), 12);
    assert_eq!(scenario.transactions[0].name, LOGIN_TRANSACTION);

    let total_weight: usize = scenario.transactions[1..].iter().map(|t| t.weight).sum();
    assert_eq!(total_weight, 51);
}

#[test]
fn test_single_station_profile_rejected() {
    let file = profile_file("stations = [\"shanghai\"]\n");
    let path = file.path().to_string_lossy().to_string();

    let err = LoadgenSettings::from_lookup(|name| {
        (name == PROFILE_PATH_VAR).then(|| path.clone())
    })
    .unwrap_err();

    assert!(matches!(err, OpsError::InvalidConfigValueError { .. }));
}

#[test]
fn test_unknown_variant_rejected() {
    let err = LoadgenSettings::from_lookup(|name| {
        (name == VARIANT_VAR).then(|| "stress".to_string())
    })
    .unwrap_err();

    match err {
        OpsError::InvalidConfigValueError { field, value, .. } => {
            assert_eq!(field, VARIANT_VAR);
            assert_eq!(value, "stress");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_profile_file_is_io_error() {
    let err = LoadgenSettings::from_lookup(|name| {
        (name == PROFILE_PATH_VAR).then(|| "/nonexistent/profile.toml".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, OpsError::IoError(_)));
}

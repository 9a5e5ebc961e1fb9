//! Configuration parsing and validation tests

use std::str::FromStr;
use std::time::Duration;

use logfan_event::Severity;

use crate::{BackpressurePolicy, Config, ConfigError, DestinationConfig};

#[test]
fn test_empty_config_uses_defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config.router.tick_interval, Duration::from_millis(200));
    assert_eq!(config.router.default_app, "unknown");
    assert!(config.destinations.is_empty());
    config.validate().unwrap();
}

#[test]
fn test_bare_destination_section_gets_defaults() {
    let config = Config::from_str("[destinations.archive]\n").unwrap();
    let dest = &config.destinations["archive"];
    assert!(dest.severity_threshold.is_none());
    assert_eq!(dest.max_batch_events, 500);
    assert_eq!(dest.max_batch_bytes, 1024 * 1024);
    assert_eq!(dest.max_batch_age, Duration::from_secs(5));
    assert_eq!(dest.retry_max_attempts, 3);
    assert_eq!(dest.retry_backoff_base, Duration::from_millis(200));
    assert_eq!(dest.retry_backoff_max, Duration::from_secs(10));
    assert_eq!(dest.backpressure_ceiling, 10_000);
    assert_eq!(dest.backpressure_policy, BackpressurePolicy::Block);
    config.validate().unwrap();
}

#[test]
fn test_full_destination_parse() {
    let toml = r#"
[router]
tick_interval = "50ms"
default_app = "platform"

[destinations.alert]
severity_threshold = "error"
max_batch_events = 50
max_batch_bytes = 65536
max_batch_age = "2s"
retry_max_attempts = 5
retry_backoff_base = "100ms"
retry_backoff_max = "30s"
backpressure_ceiling = 1000
backpressure_policy = "drop_oldest"

[destinations.archive]
max_batch_age = "30s"
"#;
    let config = Config::from_str(toml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.router.tick_interval, Duration::from_millis(50));
    assert_eq!(config.router.default_app, "platform");

    let alert = &config.destinations["alert"];
    assert_eq!(alert.severity_threshold, Some(Severity::Error));
    assert_eq!(alert.max_batch_events, 50);
    assert_eq!(alert.max_batch_bytes, 65536);
    assert_eq!(alert.max_batch_age, Duration::from_secs(2));
    assert_eq!(alert.retry_max_attempts, 5);
    assert_eq!(alert.retry_backoff_base, Duration::from_millis(100));
    assert_eq!(alert.retry_backoff_max, Duration::from_secs(30));
    assert_eq!(alert.backpressure_ceiling, 1000);
    assert_eq!(alert.backpressure_policy, BackpressurePolicy::DropOldest);

    let archive = &config.destinations["archive"];
    assert!(archive.severity_threshold.is_none());
    assert_eq!(archive.max_batch_age, Duration::from_secs(30));
}

#[test]
fn test_severity_warning_threshold_parses() {
    let config = Config::from_str(
        "[destinations.alert]\nseverity_threshold = \"warning\"\n",
    )
    .unwrap();
    assert_eq!(
        config.destinations["alert"].severity_threshold,
        Some(Severity::Warning)
    );
}

#[test]
fn test_invalid_toml_rejected() {
    let err = Config::from_str("[destinations.alert\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_severity_rejected() {
    let err = Config::from_str("[destinations.alert]\nseverity_threshold = \"fatal\"\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_backpressure_policy_rejected() {
    let err = Config::from_str("[destinations.a]\nbackpressure_policy = \"shed\"\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_zero_tick_interval_fails_validation() {
    let config = Config::from_str("[router]\ntick_interval = \"0s\"\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("tick_interval"));
}

#[test]
fn test_zero_batch_events_fails_validation() {
    let config = Config::from_str("[destinations.alert]\nmax_batch_events = 0\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("alert"));
    assert!(err.to_string().contains("max_batch_events"));
}

#[test]
fn test_zero_retry_attempts_fails_validation() {
    let config =
        Config::from_str("[destinations.alert]\nretry_max_attempts = 0\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("retry_max_attempts"));
}

#[test]
fn test_ceiling_below_batch_size_fails_validation() {
    let config = Config::from_str(
        "[destinations.alert]\nmax_batch_events = 500\nbackpressure_ceiling = 100\n",
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("backpressure_ceiling"));
}

#[test]
fn test_router_section_builds_partition_extractor() {
    use logfan_event::{Event, Severity};

    let config = Config::from_str("[router]\ndefault_app = \"platform\"\n").unwrap();
    let extractor = config.router.partition_extractor();

    let anonymous = Event::builder(Severity::Info, "no source").build();
    assert_eq!(extractor.extract(&anonymous).app(), "platform");

    let named = Event::builder(Severity::Info, "named").source("billing").build();
    assert_eq!(extractor.extract(&named).app(), "billing");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Config::from_file("/nonexistent/logfan.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_destination_config_default_is_valid() {
    DestinationConfig::default().validate("default").unwrap();
}

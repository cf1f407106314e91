use flowid_config::TelemetryConfig;
use flowid_telemetry::PoolLogger;

// Installs the global subscriber, so it lives in its own test binary.
#[test]
fn subscriber_installs_only_once() {
    PoolLogger::init_from_config(&TelemetryConfig::default()).unwrap();
    assert!(PoolLogger::init("debug").is_err());
}

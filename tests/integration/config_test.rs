//! Configuration loading

use stakebook::config::Config;
use stakebook::telemetry::LogFormat;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();

    assert_eq!(config.staking.bankroll_units, 500.0);
    assert_eq!(config.staking.kelly_fraction, 0.25);
    assert!((config.staking.max_bet_units() - 50.0).abs() < 1e-9);
    assert!((config.staking.exposure_cap_units() - 75.0).abs() < 1e-9);
    assert_eq!(config.staking.multipliers.matchup3, 0.6);
    assert_eq!(config.feed.api_key_env, "DATAGOLF_API_KEY");
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert_eq!(config.telemetry.metrics_port, None);
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [staking]
        bankroll_units = 1000.0

        [store]
        path = "/tmp/other-bets.json"

        [telemetry]
        log_format = "json"
        metrics_port = 9100
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.staking.bankroll_units, 1000.0);
    assert_eq!(config.staking.cap_fraction, 0.15);
    assert_eq!(config.store.path, std::path::PathBuf::from("/tmp/other-bets.json"));
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert_eq!(config.telemetry.metrics_port, Some(9100));
}

#[test]
fn test_config_load_missing_file() {
    assert!(Config::load("/nonexistent/stakebook.toml").is_err());
}

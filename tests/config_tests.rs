use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use arb_engine::error::{ConfigError, Error};
use arb_engine::infrastructure::config::settings::Config;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("arb-engine-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn config_rejects_invalid_slippage() {
    let toml = r#"
exchange = "polymarket"

[exchange_config]
type = "polymarket"
ws_url = "wss://ws-subscriptions-clob.polymarket.com/ws/market"
api_url = "https://clob.polymarket.com"

[logging]
level = "info"
format = "pretty"

[risk]
max_slippage = 1.5
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_slippage",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid slippage error, got {err}"),
        Ok(config) => panic!(
            "Expected invalid slippage to be rejected, got {}",
            config.risk.max_slippage
        ),
    }
}

#[test]
fn config_rejects_missing_exchange_urls() {
    let toml = r#"
exchange = "polymarket"

[exchange_config]
type = "polymarket"
ws_url = ""
api_url = ""

[logging]
level = "info"
format = "pretty"
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(
        matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "ws_url" }))
        ),
        "Expected missing ws_url to be rejected"
    );
}

#[test]
fn config_rejects_negative_risk_limits() {
    let toml = r#"
exchange = "polymarket"

[exchange_config]
type = "polymarket"
ws_url = "wss://ws-subscriptions-clob.polymarket.com/ws/market"
api_url = "https://clob.polymarket.com"

[logging]
level = "info"
format = "pretty"

[risk]
max_position_per_market = -1
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_position_per_market",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid risk limit error, got {err}"),
        Ok(_) => panic!("Expected invalid risk limit to be rejected"),
    }
}

#[test]
fn config_rejects_invalid_reconnection_backoff() {
    let toml = r#"
exchange = "polymarket"

[exchange_config]
type = "polymarket"
ws_url = "wss://ws-subscriptions-clob.polymarket.com/ws/market"
api_url = "https://clob.polymarket.com"

[logging]
level = "info"
format = "pretty"

[reconnection]
backoff_multiplier = 0.5
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "backoff_multiplier",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid backoff error, got {err}"),
        Ok(_) => panic!("Expected invalid backoff to be rejected"),
    }
}

#[test]
fn config_accepts_dry_run_with_custom_fill_latency() {
    let toml = r#"
exchange = "polymarket"
dry_run = true
dry_run_fill_latency_ms = 50

[exchange_config]
type = "polymarket"
ws_url = "wss://ws-subscriptions-clob.polymarket.com/ws/market"
api_url = "https://clob.polymarket.com"

[logging]
level = "info"
format = "pretty"
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    let config = result.expect("dry-run config should be valid");
    assert!(config.dry_run);
    assert_eq!(config.dry_run_fill_latency_ms, 50);
}

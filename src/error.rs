use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Polymarket SDK error: {0}")]
    Polymarket(#[from] polymarket_client_sdk::error::Error),

    #[error(transparent)]
    ConfigInvalid(#[from] ConfigError),

    #[error(transparent)]
    ExecutionFailed(#[from] ExecutionError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons loading or validating a configuration can fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required config field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reasons submitting or managing an order on a venue can fail.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid token id {token_id}: {reason}")]
    InvalidTokenId { token_id: String, reason: String },

    #[error("failed to build order: {0}")]
    OrderBuildFailed(String),

    #[error("failed to sign order: {0}")]
    SigningFailed(String),

    #[error("failed to submit order: {0}")]
    SubmissionFailed(String),

    #[error("order rejected: {0}")]
    OrderRejected(String),
}

/// Reasons a proposed trade may be rejected by the risk gate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("circuit breaker active: {reason}")]
    CircuitBreakerActive { reason: String },

    #[error("expected profit {expected} below minimum threshold {threshold}")]
    ProfitBelowThreshold {
        expected: Decimal,
        threshold: Decimal,
    },

    #[error("position in {market_id} would reach {current} (limit {limit})")]
    PositionLimitExceeded {
        market_id: String,
        current: Decimal,
        limit: Decimal,
    },

    #[error("exposure {current} + {additional} would exceed limit {limit}")]
    ExposureLimitExceeded {
        current: Decimal,
        additional: Decimal,
        limit: Decimal,
    },

    #[error("slippage {actual} exceeds maximum {max}")]
    SlippageTooHigh { actual: Decimal, max: Decimal },

    #[error("market {market_id} is quarantined after an unresolved partial fill")]
    MarketQuarantined { market_id: String },

    #[error("bankroll-sized notional {notional} is below the minimum of {minimum}")]
    BelowMinimumNotional { notional: Decimal, minimum: Decimal },
}

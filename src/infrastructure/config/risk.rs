//! Risk management configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::state::RiskLimits;

/// Risk management configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Maximum position size per market in dollars.
    #[serde(default = "default_max_position_per_market")]
    pub max_position_per_market: Decimal,
    /// Maximum total exposure across all positions.
    #[serde(default = "default_max_total_exposure")]
    pub max_total_exposure: Decimal,
    /// Minimum profit threshold to execute.
    #[serde(default = "default_min_profit_threshold")]
    pub min_profit_threshold: Decimal,
    /// Maximum slippage tolerance (e.g., 0.02 = 2%).
    #[serde(default = "default_max_slippage")]
    pub max_slippage: Decimal,
    /// Execution timeout in seconds (default: 30).
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,
    /// Maximum time to wait for a partial fill to resolve via escalation
    /// before flattening, in milliseconds (default: 1500).
    #[serde(default = "default_max_imbalance_ms")]
    pub max_imbalance_ms: u64,
    /// Maximum ticks a hedge order may cross the reference price by
    /// (default: 5).
    #[serde(default = "default_max_slippage_ticks")]
    pub max_slippage_ticks: u32,
    /// How long a per-market execution lock may be held before being
    /// force-released, in seconds (default: 10).
    #[serde(default = "default_reservation_ttl_secs")]
    pub reservation_ttl_secs: u64,
    /// Maximum fraction of available bankroll committed to a single
    /// opportunity (default: 1.0, i.e. no fractional cap).
    #[serde(default = "default_max_bankroll_fraction")]
    pub max_bankroll_fraction: Decimal,
    /// Hard cap on notional size for any single opportunity
    /// (default: 1,000,000).
    #[serde(default = "default_max_bet_size")]
    pub max_bet_size: Decimal,
    /// Minimum bankroll-sized notional worth taking (default: 0).
    #[serde(default = "default_min_notional")]
    pub min_notional: Decimal,
}

fn default_max_position_per_market() -> Decimal {
    Decimal::from(1000)
}

fn default_max_total_exposure() -> Decimal {
    Decimal::from(10000)
}

fn default_min_profit_threshold() -> Decimal {
    Decimal::new(5, 2) // $0.05
}

fn default_max_slippage() -> Decimal {
    Decimal::new(2, 2) // 2%
}

const fn default_execution_timeout_secs() -> u64 {
    30
}

const fn default_max_imbalance_ms() -> u64 {
    1500
}

const fn default_max_slippage_ticks() -> u32 {
    5
}

const fn default_reservation_ttl_secs() -> u64 {
    10
}

fn default_max_bankroll_fraction() -> Decimal {
    Decimal::ONE
}

fn default_max_bet_size() -> Decimal {
    Decimal::from(1_000_000)
}

fn default_min_notional() -> Decimal {
    Decimal::ZERO
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_per_market: default_max_position_per_market(),
            max_total_exposure: default_max_total_exposure(),
            min_profit_threshold: default_min_profit_threshold(),
            max_slippage: default_max_slippage(),
            execution_timeout_secs: default_execution_timeout_secs(),
            max_imbalance_ms: default_max_imbalance_ms(),
            max_slippage_ticks: default_max_slippage_ticks(),
            reservation_ttl_secs: default_reservation_ttl_secs(),
            max_bankroll_fraction: default_max_bankroll_fraction(),
            max_bet_size: default_max_bet_size(),
            min_notional: default_min_notional(),
        }
    }
}

impl From<RiskConfig> for RiskLimits {
    fn from(config: RiskConfig) -> Self {
        Self {
            max_position_per_market: config.max_position_per_market,
            max_total_exposure: config.max_total_exposure,
            min_profit_threshold: config.min_profit_threshold,
            max_slippage: config.max_slippage,
            execution_timeout_secs: config.execution_timeout_secs,
            max_imbalance_ms: config.max_imbalance_ms,
            max_slippage_ticks: config.max_slippage_ticks,
            reservation_ttl_secs: config.reservation_ttl_secs,
            max_bankroll_fraction: config.max_bankroll_fraction,
            max_bet_size: config.max_bet_size,
            min_notional: config.min_notional,
        }
    }
}

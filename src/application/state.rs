//! Shared application state.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;

use crate::application::cache::position::PositionTracker;
use crate::domain::{money::Price, position::PositionStatus};
use crate::port::inbound::runtime::{
    RuntimePosition, RuntimePositionStatus, RuntimeRiskLimitKind, RuntimeRiskLimitUpdateError,
    RuntimeRiskLimits, RuntimeState,
};

/// Risk limits configuration.
#[derive(Debug, Clone)]
pub struct RiskLimits {
    /// Maximum position size per market in dollars.
    pub max_position_per_market: Decimal,
    /// Maximum total exposure across all positions.
    pub max_total_exposure: Decimal,
    /// Minimum profit threshold to execute.
    pub min_profit_threshold: Decimal,
    /// Maximum slippage tolerance (e.g., 0.02 = 2%).
    pub max_slippage: Decimal,
    /// Execution timeout in seconds.
    pub execution_timeout_secs: u64,
    /// Maximum time to wait for a partial fill to resolve via escalation
    /// before falling back to flattening the filled legs, in milliseconds.
    pub max_imbalance_ms: u64,
    /// Maximum number of ticks a hedge order may cross the reference price
    /// by when escalating or flattening a partial fill.
    pub max_slippage_ticks: u32,
    /// How long a per-market execution lock may be held before it is
    /// considered stuck and force-released.
    pub reservation_ttl_secs: u64,
    /// Maximum fraction of available bankroll (`max_total_exposure` minus
    /// currently open and pending exposure) that may be committed to a
    /// single opportunity. 1.0 means no fractional cap beyond `max_bet_size`.
    pub max_bankroll_fraction: Decimal,
    /// Hard cap on notional size for any single opportunity, regardless of
    /// available bankroll.
    pub max_bet_size: Decimal,
    /// Minimum bankroll-sized notional below which an opportunity is not
    /// worth taking.
    pub min_notional: Decimal,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_per_market: Decimal::from(1000),
            max_total_exposure: Decimal::from(10000),
            min_profit_threshold: Decimal::new(5, 2), // $0.05
            max_slippage: Decimal::new(2, 2),         // 2%
            execution_timeout_secs: 30,
            max_imbalance_ms: 1500,
            max_slippage_ticks: 5,
            reservation_ttl_secs: 10,
            max_bankroll_fraction: Decimal::ONE,
            max_bet_size: Decimal::from(1_000_000),
            min_notional: Decimal::ZERO,
        }
    }
}

/// Risk limit fields that may be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLimitKind {
    MaxPositionPerMarket,
    MaxTotalExposure,
    MinProfitThreshold,
    MaxSlippage,
}

impl RiskLimitKind {
    /// Stable field name used in logs and command output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxPositionPerMarket => "max_position",
            Self::MaxTotalExposure => "max_exposure",
            Self::MinProfitThreshold => "min_profit",
            Self::MaxSlippage => "max_slippage",
        }
    }
}

/// Error returned when a runtime risk limit update is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskLimitUpdateError {
    reason: &'static str,
}

impl RiskLimitUpdateError {
    #[must_use]
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

impl std::fmt::Display for RiskLimitUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for RiskLimitUpdateError {}

fn app_limits_to_runtime(limits: RiskLimits) -> RuntimeRiskLimits {
    RuntimeRiskLimits {
        max_position_per_market: limits.max_position_per_market,
        max_total_exposure: limits.max_total_exposure,
        min_profit_threshold: limits.min_profit_threshold,
        max_slippage: limits.max_slippage,
    }
}

fn runtime_kind_to_app(kind: RuntimeRiskLimitKind) -> RiskLimitKind {
    match kind {
        RuntimeRiskLimitKind::MaxPositionPerMarket => RiskLimitKind::MaxPositionPerMarket,
        RuntimeRiskLimitKind::MaxTotalExposure => RiskLimitKind::MaxTotalExposure,
        RuntimeRiskLimitKind::MinProfitThreshold => RiskLimitKind::MinProfitThreshold,
        RuntimeRiskLimitKind::MaxSlippage => RiskLimitKind::MaxSlippage,
    }
}

/// Shared application state accessible by all services.
pub struct AppState {
    /// Position tracker for all open/closed positions.
    positions: RwLock<PositionTracker>,
    /// Risk limits configuration.
    risk_limits: RwLock<RiskLimits>,
    /// Circuit breaker - when true, no new trades.
    circuit_breaker: AtomicBool,
    /// Reason for circuit breaker activation.
    circuit_breaker_reason: RwLock<Option<String>>,
    /// Markets with in-flight executions (prevents duplicate trades), keyed
    /// to the instant the lock was acquired so stale locks can be swept.
    pending_executions: Mutex<HashMap<String, Instant>>,
    /// Pending exposure from approved opportunities not yet executed.
    pending_exposure: Mutex<Decimal>,
    /// Markets excluded from new opportunities after an unresolved partial
    /// fill, until an operator clears them.
    quarantined_markets: Mutex<HashSet<String>>,
}

impl AppState {
    /// Create new app state with given risk limits.
    #[must_use]
    pub fn new(risk_limits: RiskLimits) -> Self {
        Self {
            positions: RwLock::new(PositionTracker::new()),
            risk_limits: RwLock::new(risk_limits),
            circuit_breaker: AtomicBool::new(false),
            circuit_breaker_reason: RwLock::new(None),
            pending_executions: Mutex::new(HashMap::new()),
            pending_exposure: Mutex::new(Decimal::ZERO),
            quarantined_markets: Mutex::new(HashSet::new()),
        }
    }

    /// Get read access to positions.
    pub fn positions(&self) -> parking_lot::RwLockReadGuard<'_, PositionTracker> {
        self.positions.read()
    }

    /// Get write access to positions.
    pub fn positions_mut(&self) -> parking_lot::RwLockWriteGuard<'_, PositionTracker> {
        self.positions.write()
    }

    /// Get risk limits.
    pub fn risk_limits(&self) -> RiskLimits {
        self.risk_limits.read().clone()
    }

    /// Set one risk limit at runtime with validation.
    ///
    /// Returns a full snapshot of limits after the update.
    pub fn set_risk_limit(
        &self,
        kind: RiskLimitKind,
        value: Decimal,
    ) -> Result<RiskLimits, RiskLimitUpdateError> {
        match kind {
            RiskLimitKind::MaxPositionPerMarket | RiskLimitKind::MaxTotalExposure => {
                if value <= Decimal::ZERO {
                    return Err(RiskLimitUpdateError::new("value must be greater than 0"));
                }
            }
            RiskLimitKind::MinProfitThreshold => {
                if value < Decimal::ZERO {
                    return Err(RiskLimitUpdateError::new("value must be 0 or greater"));
                }
            }
            RiskLimitKind::MaxSlippage => {
                if value < Decimal::ZERO || value > Decimal::ONE {
                    return Err(RiskLimitUpdateError::new("value must be between 0 and 1"));
                }
            }
        }

        let mut limits = self.risk_limits.write();
        match kind {
            RiskLimitKind::MaxPositionPerMarket => limits.max_position_per_market = value,
            RiskLimitKind::MaxTotalExposure => limits.max_total_exposure = value,
            RiskLimitKind::MinProfitThreshold => limits.min_profit_threshold = value,
            RiskLimitKind::MaxSlippage => limits.max_slippage = value,
        }

        Ok(limits.clone())
    }

    /// Check if circuit breaker is active.
    pub fn is_circuit_breaker_active(&self) -> bool {
        self.circuit_breaker.load(Ordering::SeqCst)
    }

    /// Activate circuit breaker with reason.
    pub fn activate_circuit_breaker(&self, reason: impl Into<String>) {
        self.circuit_breaker.store(true, Ordering::SeqCst);
        *self.circuit_breaker_reason.write() = Some(reason.into());
    }

    /// Reset circuit breaker.
    pub fn reset_circuit_breaker(&self) {
        self.circuit_breaker.store(false, Ordering::SeqCst);
        *self.circuit_breaker_reason.write() = None;
    }

    /// Get circuit breaker reason if active.
    pub fn circuit_breaker_reason(&self) -> Option<String> {
        self.circuit_breaker_reason.read().clone()
    }

    /// Get current total exposure.
    pub fn total_exposure(&self) -> Price {
        self.positions.read().total_exposure()
    }

    /// Count open positions.
    pub fn open_position_count(&self) -> usize {
        self.positions.read().open_count()
    }

    /// Try to acquire execution lock for a market.
    /// Returns `true` if lock acquired, `false` if already locked.
    pub fn try_lock_execution(&self, market_id: &str) -> bool {
        let mut guard = self.pending_executions.lock();
        if guard.contains_key(market_id) {
            false
        } else {
            guard.insert(market_id.to_string(), Instant::now());
            true
        }
    }

    /// Release execution lock for a market.
    pub fn release_execution(&self, market_id: &str) {
        self.pending_executions.lock().remove(market_id);
    }

    /// Count markets with in-flight executions.
    pub fn pending_execution_count(&self) -> usize {
        self.pending_executions.lock().len()
    }

    /// Force-release execution locks held longer than `ttl`.
    ///
    /// A stuck lock (the execution task panicked or hung without releasing
    /// it) would otherwise block that market forever. Returns the markets
    /// that were force-released so the caller can log and quarantine them.
    pub fn sweep_stale_executions(&self, ttl: Duration) -> Vec<String> {
        let mut guard = self.pending_executions.lock();
        let now = Instant::now();
        let stale: Vec<String> = guard
            .iter()
            .filter(|(_, started)| now.duration_since(**started) > ttl)
            .map(|(market_id, _)| market_id.clone())
            .collect();
        for market_id in &stale {
            guard.remove(market_id);
        }
        stale
    }

    /// Exclude a market from new opportunities after an unresolved partial
    /// fill incident.
    pub fn quarantine_market(&self, market_id: &str) {
        self.quarantined_markets.lock().insert(market_id.to_string());
    }

    /// Return `true` if the market is currently quarantined.
    pub fn is_quarantined(&self, market_id: &str) -> bool {
        self.quarantined_markets.lock().contains(market_id)
    }

    /// Clear a market's quarantine, allowing it to trade again.
    ///
    /// Returns `true` if the market was quarantined.
    pub fn clear_quarantine(&self, market_id: &str) -> bool {
        self.quarantined_markets.lock().remove(market_id)
    }

    /// List currently quarantined markets.
    pub fn quarantined_markets(&self) -> Vec<String> {
        self.quarantined_markets.lock().iter().cloned().collect()
    }

    /// Get current pending exposure.
    pub fn pending_exposure(&self) -> Price {
        *self.pending_exposure.lock()
    }

    /// Available bankroll: the configured total exposure limit (`total`
    /// in the bankroll model) minus currently open positions and pending
    /// reservations (`reserved`), i.e. `available = total - reserved`.
    pub fn available_bankroll(&self) -> Decimal {
        let limit = self.risk_limits.read().max_total_exposure;
        let current = self.positions.read().total_exposure();
        let pending = *self.pending_exposure.lock();
        (limit - current - pending).max(Decimal::ZERO)
    }

    /// Try to reserve exposure atomically.
    /// Returns `true` if reservation succeeded, `false` if it would exceed limit.
    pub fn try_reserve_exposure(&self, amount: Price) -> bool {
        let positions = self.positions.read();
        let mut pending = self.pending_exposure.lock();
        let current = positions.total_exposure();
        let limit = self.risk_limits.read().max_total_exposure;

        if current + *pending + amount > limit {
            return false;
        }

        *pending += amount;
        true
    }

    /// Release reserved exposure.
    pub fn release_exposure(&self, amount: Price) {
        let mut pending = self.pending_exposure.lock();
        *pending -= amount;
        // Ensure we don't go negative (shouldn't happen, but safety check)
        if *pending < Decimal::ZERO {
            *pending = Decimal::ZERO;
        }
    }
}

impl RuntimeState for AppState {
    fn risk_limits(&self) -> RuntimeRiskLimits {
        app_limits_to_runtime(AppState::risk_limits(self))
    }

    fn set_risk_limit(
        &self,
        kind: RuntimeRiskLimitKind,
        value: Decimal,
    ) -> Result<RuntimeRiskLimits, RuntimeRiskLimitUpdateError> {
        AppState::set_risk_limit(self, runtime_kind_to_app(kind), value)
            .map(app_limits_to_runtime)
            .map_err(|err| RuntimeRiskLimitUpdateError::new(err.reason()))
    }

    fn is_circuit_breaker_active(&self) -> bool {
        AppState::is_circuit_breaker_active(self)
    }

    fn circuit_breaker_reason(&self) -> Option<String> {
        AppState::circuit_breaker_reason(self)
    }

    fn activate_circuit_breaker(&self, reason: &str) {
        AppState::activate_circuit_breaker(self, reason);
    }

    fn reset_circuit_breaker(&self) {
        AppState::reset_circuit_breaker(self);
    }

    fn open_position_count(&self) -> usize {
        AppState::open_position_count(self)
    }

    fn total_exposure(&self) -> Price {
        AppState::total_exposure(self)
    }

    fn pending_exposure(&self) -> Price {
        AppState::pending_exposure(self)
    }

    fn pending_execution_count(&self) -> usize {
        AppState::pending_execution_count(self)
    }

    fn active_positions(&self) -> Vec<RuntimePosition> {
        AppState::positions(self)
            .all()
            .filter(|p| !p.status().is_closed())
            .map(|p| RuntimePosition {
                market_id: p.market_id().as_str().to_string(),
                status: match p.status() {
                    PositionStatus::Open => RuntimePositionStatus::Open,
                    PositionStatus::PartialFill { .. } => RuntimePositionStatus::PartialFill,
                    PositionStatus::Closed { .. } => RuntimePositionStatus::Closed,
                },
                entry_cost: p.entry_cost(),
                expected_profit: p.expected_profit(),
            })
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RiskLimits::default())
    }
}

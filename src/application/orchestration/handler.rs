//! Shared context types for market-event and opportunity handling.

use std::sync::Arc;

use crate::application::cache::book::BookCache;
use crate::application::position::manager::PositionManager;
use crate::application::risk::manager::RiskManager;
use crate::application::state::AppState;
use crate::domain::market::MarketRegistry;
use crate::port::inbound::strategy::StrategyEngine;
use crate::port::outbound::exchange::ArbitrageExecutor;
use crate::port::outbound::notifier::NotifierRegistry;
use crate::port::outbound::stats::StatsRecorder;

pub(crate) use super::event::handle_market_event;
pub(crate) use super::opportunity::handle_opportunity;

/// Everything a single market event needs in order to run detection,
/// risk-gate, and (if approved) execution.
pub struct MarketEventHandlingContext<'a> {
    /// Order book cache updated by the event before detection runs.
    pub cache: &'a BookCache,
    /// Market registry used to resolve a token update to its market.
    pub registry: &'a MarketRegistry,
    /// Strategy engine run against the updated market.
    pub strategies: &'a dyn StrategyEngine,
    /// Arbitrage executor, absent when running in detection-only mode.
    pub executor: Option<Arc<dyn ArbitrageExecutor + Send + Sync>>,
    /// Risk gate consulted before any execution.
    pub risk_manager: &'a RiskManager,
    /// Notification fan-out.
    pub notifiers: &'a Arc<NotifierRegistry>,
    /// Shared runtime state (positions, circuit breaker, exposure).
    pub state: &'a Arc<AppState>,
    /// Statistics recorder.
    pub stats: &'a Arc<dyn StatsRecorder>,
    /// Position lifecycle manager, used on settlement events.
    pub position_manager: &'a Arc<PositionManager>,
}

impl<'a> MarketEventHandlingContext<'a> {
    /// Project this context down to what a single opportunity needs.
    ///
    /// Called once per detected opportunity, so the executor handle is
    /// cloned (cheap `Arc` bump) rather than moved out of the context.
    pub(crate) fn opportunity_context(&self) -> OpportunityHandlingContext<'a> {
        OpportunityHandlingContext {
            executor: self.executor.clone(),
            risk_manager: self.risk_manager,
            notifiers: self.notifiers,
            state: self.state,
            stats: self.stats,
            cache: self.cache,
        }
    }
}

/// Context needed to risk-gate and (if approved) execute a single
/// detected opportunity.
pub struct OpportunityHandlingContext<'a> {
    /// Arbitrage executor, absent when running in detection-only mode.
    pub executor: Option<Arc<dyn ArbitrageExecutor + Send + Sync>>,
    /// Risk gate consulted before execution.
    pub risk_manager: &'a RiskManager,
    /// Notification fan-out.
    pub notifiers: &'a Arc<NotifierRegistry>,
    /// Shared runtime state (positions, circuit breaker, exposure).
    pub state: &'a Arc<AppState>,
    /// Statistics recorder.
    pub stats: &'a Arc<dyn StatsRecorder>,
    /// Order book cache, used to re-check slippage against current prices.
    pub cache: &'a BookCache,
}

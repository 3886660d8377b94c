//! Arbitrage execution flow.
//!
//! Spawns a detached task per approved opportunity so that slow order
//! submission never blocks the event-processing loop. The reserved
//! exposure and the per-market execution lock taken in `opportunity.rs`
//! are always released here, regardless of outcome.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::hedge::{resolve_partial_fill, HedgeOutcome};
use super::position::{record_partial_position, record_position};
use crate::application::state::AppState;
use crate::domain::opportunity::Opportunity;
use crate::domain::stats::{TradeLeg, TradeOpenEvent};
use crate::domain::trade::TradeResult;
use crate::port::outbound::exchange::ArbitrageExecutor;
use crate::port::outbound::notifier::{Event, ExecutionEvent, NotifierRegistry};
use crate::port::outbound::stats::StatsRecorder;

/// Execute an approved opportunity on a detached task.
pub(crate) fn spawn_execution(
    executor: Arc<dyn ArbitrageExecutor + Send + Sync>,
    opportunity: Opportunity,
    notifiers: Arc<NotifierRegistry>,
    state: Arc<AppState>,
    stats: Arc<dyn StatsRecorder>,
    opportunity_id: Option<i32>,
) {
    tokio::spawn(async move {
        let market_id = opportunity.market_id().to_string();
        let reserved_exposure = opportunity.total_cost() * opportunity.volume();

        let trade_id = stats.record_trade_open(&TradeOpenEvent {
            opportunity_id: opportunity_id.unwrap_or(-1),
            strategy: opportunity.strategy().to_string(),
            market_ids: vec![market_id.clone()],
            legs: opportunity
                .legs()
                .iter()
                .map(|leg| TradeLeg {
                    token_id: leg.token_id().to_string(),
                    side: "buy".to_string(),
                    price: leg.ask_price(),
                    size: opportunity.volume(),
                })
                .collect(),
            size: opportunity.volume(),
            expected_profit: opportunity.expected_profit(),
        });

        let outcome = executor
            .execute_arbitrage(&opportunity, trade_id.unwrap_or(-1))
            .await;

        let trade_result = match outcome {
            Ok(result) => result,
            Err(err) => {
                error!(market_id = %market_id, error = %err, "Arbitrage execution errored");
                TradeResult::Failed {
                    reason: err.to_string(),
                }
            }
        };

        match &trade_result {
            TradeResult::Success { .. } => {
                record_position(&state, &opportunity, trade_id);
                info!(market_id = %market_id, "Arbitrage executed successfully");
            }
            TradeResult::Partial { fills, failures } => {
                record_partial_position(&state, &opportunity, fills, failures, trade_id);
                warn!(
                    market_id = %market_id,
                    fills = fills.len(),
                    failures = failures.len(),
                    "Arbitrage partially filled"
                );

                let hedge_outcome = resolve_partial_fill(
                    &executor,
                    &opportunity,
                    fills,
                    failures,
                    &notifiers,
                    &state,
                )
                .await;
                match hedge_outcome {
                    HedgeOutcome::Completed => {
                        info!(market_id = %market_id, "Partial fill resolved via escalation")
                    }
                    HedgeOutcome::Flattened => {
                        warn!(market_id = %market_id, "Partial fill resolved via flattening")
                    }
                    HedgeOutcome::Unresolved => {
                        error!(market_id = %market_id, "Partial fill left unresolved")
                    }
                }
            }
            TradeResult::Failed { reason } => {
                warn!(market_id = %market_id, reason = %reason, "Arbitrage execution failed");
            }
        }

        notifiers.notify_all(Event::ExecutionCompleted(ExecutionEvent::from_result(
            &market_id,
            &trade_result,
        )));

        state.release_exposure(reserved_exposure);
        state.release_execution(&market_id);
    });
}

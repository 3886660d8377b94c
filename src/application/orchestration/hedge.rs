//! Partial-fill resolution for arbitrage executions.
//!
//! A partial fill leaves the position directionally exposed instead of
//! risk-free. This module tries to square it back up: escalate the unfilled
//! legs to a marketable price within a bounded window, and if that doesn't
//! land, flatten the legs that did fill. A market that can't be resolved
//! either way is quarantined so the detector stops proposing it until an
//! operator clears it.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::application::state::AppState;
use crate::domain::opportunity::Opportunity;
use crate::domain::trade::{Failure, Fill};
use crate::port::outbound::exchange::{ArbitrageExecutor, OrderRequest, OrderSide};
use crate::port::outbound::notifier::{Event, HedgeEvent, NotifierRegistry};

/// Outcome of attempting to resolve a partial fill.
pub(crate) enum HedgeOutcome {
    /// The missing legs were escalated to a marketable price; the position
    /// is now complete.
    Completed,
    /// The filled legs were sold back out; the position is flat again.
    Flattened,
    /// Neither escalation nor flattening succeeded within the allotted time.
    Unresolved,
}

/// Attempt to resolve a partial fill, quarantining the market if it can't be.
pub(crate) async fn resolve_partial_fill(
    executor: &Arc<dyn ArbitrageExecutor + Send + Sync>,
    opportunity: &Opportunity,
    fills: &[Fill],
    failures: &[Failure],
    notifiers: &Arc<NotifierRegistry>,
    state: &Arc<AppState>,
) -> HedgeOutcome {
    let market_id = opportunity.market_id().to_string();
    if failures.is_empty() {
        return HedgeOutcome::Completed;
    }

    let limits = state.risk_limits();
    let window = Duration::from_millis(limits.max_imbalance_ms);
    let slippage_budget = opportunity.tick_size() * Decimal::from(limits.max_slippage_ticks);

    info!(
        market_id = %market_id,
        missing = failures.len(),
        window_ms = limits.max_imbalance_ms,
        "Attempting to resolve partial fill"
    );

    let escalation = escalate_missing_legs(executor, opportunity, failures, slippage_budget);
    if matches!(timeout(window, escalation).await, Ok(true)) {
        info!(market_id = %market_id, "Partial fill resolved by escalating unfilled legs");
        notifiers.notify_all(Event::HedgeTriggered(HedgeEvent::resolved(
            &market_id,
            "escalated unfilled legs to a marketable price",
        )));
        return HedgeOutcome::Completed;
    }

    warn!(
        market_id = %market_id,
        "Escalation did not resolve partial fill within window, flattening filled legs"
    );

    let flattening = flatten_filled_legs(executor, opportunity, fills, slippage_budget);
    if matches!(timeout(window, flattening).await, Ok(true)) {
        warn!(market_id = %market_id, "Partial fill resolved by flattening filled legs");
        notifiers.notify_all(Event::HedgeTriggered(HedgeEvent::resolved(
            &market_id,
            "flattened filled legs after failed escalation",
        )));
        return HedgeOutcome::Flattened;
    }

    error!(
        market_id = %market_id,
        "Partial fill could not be resolved, quarantining market"
    );
    state.quarantine_market(&market_id);
    notifiers.notify_all(Event::HedgeTriggered(HedgeEvent::unresolved(
        &market_id,
        "could not escalate or flatten the imbalance; market quarantined",
    )));
    HedgeOutcome::Unresolved
}

/// Resubmit the missing legs at a marketable price, crossing the spread by
/// up to `slippage_budget`. Returns `true` only if every missing leg fills.
async fn escalate_missing_legs(
    executor: &Arc<dyn ArbitrageExecutor + Send + Sync>,
    opportunity: &Opportunity,
    failures: &[Failure],
    slippage_budget: Decimal,
) -> bool {
    for failure in failures {
        let Some(leg) = opportunity
            .legs()
            .iter()
            .find(|leg| leg.token_id() == &failure.token_id)
        else {
            continue;
        };

        let request = OrderRequest {
            token_id: leg.token_id().to_string(),
            side: OrderSide::Buy,
            size: opportunity.volume(),
            price: leg.ask_price() + slippage_budget,
            client_id: None,
        };

        match executor.execute(&request).await {
            Ok(result) if !result.is_failed() => continue,
            _ => return false,
        }
    }
    true
}

/// Sell the filled legs back out, crossing the spread by up to
/// `slippage_budget`. Returns `true` only if every filled leg is sold.
async fn flatten_filled_legs(
    executor: &Arc<dyn ArbitrageExecutor + Send + Sync>,
    opportunity: &Opportunity,
    fills: &[Fill],
    slippage_budget: Decimal,
) -> bool {
    for fill in fills {
        let Some(leg) = opportunity
            .legs()
            .iter()
            .find(|leg| leg.token_id() == &fill.token_id)
        else {
            continue;
        };

        let request = OrderRequest {
            token_id: leg.token_id().to_string(),
            side: OrderSide::Sell,
            size: opportunity.volume(),
            price: (leg.ask_price() - slippage_budget).max(Decimal::ZERO),
            client_id: None,
        };

        match executor.execute(&request).await {
            Ok(result) if !result.is_failed() => continue,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use crate::application::state::RiskLimits;
    use crate::domain::id::{MarketId, OrderId, TokenId};
    use crate::domain::opportunity::OpportunityLeg;
    use crate::domain::trade::TradeResult;
    use crate::error::Result;
    use crate::port::outbound::exchange::{ExecutionResult, OrderExecutor};

    struct AlwaysFillsExecutor;

    #[async_trait]
    impl OrderExecutor for AlwaysFillsExecutor {
        async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult> {
            Ok(ExecutionResult::Success {
                order_id: OrderId::new("hedge-order"),
                filled_amount: order.size,
                average_price: order.price,
            })
        }
        async fn cancel(&self, _order_id: &OrderId) -> Result<()> {
            Ok(())
        }
        fn exchange_name(&self) -> &'static str {
            "mock"
        }
    }

    #[async_trait]
    impl ArbitrageExecutor for AlwaysFillsExecutor {
        async fn execute_arbitrage(
            &self,
            _opportunity: &Opportunity,
            _attempt_id: i32,
        ) -> Result<TradeResult> {
            unreachable!("not exercised by these tests")
        }
        async fn cancel(&self, _order_id: &OrderId) -> Result<()> {
            Ok(())
        }
        fn exchange_name(&self) -> &'static str {
            "mock"
        }
    }

    struct AlwaysFailsExecutor;

    #[async_trait]
    impl OrderExecutor for AlwaysFailsExecutor {
        async fn execute(&self, _order: &OrderRequest) -> Result<ExecutionResult> {
            Ok(ExecutionResult::Failed {
                reason: "rejected".to_string(),
            })
        }
        async fn cancel(&self, _order_id: &OrderId) -> Result<()> {
            Ok(())
        }
        fn exchange_name(&self) -> &'static str {
            "mock"
        }
    }

    #[async_trait]
    impl ArbitrageExecutor for AlwaysFailsExecutor {
        async fn execute_arbitrage(
            &self,
            _opportunity: &Opportunity,
            _attempt_id: i32,
        ) -> Result<TradeResult> {
            unreachable!("not exercised by these tests")
        }
        async fn cancel(&self, _order_id: &OrderId) -> Result<()> {
            Ok(())
        }
        fn exchange_name(&self) -> &'static str {
            "mock"
        }
    }

    fn opportunity() -> Opportunity {
        Opportunity::new(
            MarketId::from("m"),
            "q?",
            vec![
                OpportunityLeg::new(TokenId::from("yes"), dec!(0.40)),
                OpportunityLeg::new(TokenId::from("no"), dec!(0.50)),
            ],
            dec!(10),
            dec!(1),
        )
    }

    fn fills_and_failures() -> (Vec<Fill>, Vec<Failure>) {
        (
            vec![Fill::new(TokenId::from("yes"), "order-1")],
            vec![Failure::new(TokenId::from("no"), "execution failed")],
        )
    }

    #[tokio::test]
    async fn escalation_resolves_when_executor_fills() {
        let executor: Arc<dyn ArbitrageExecutor + Send + Sync> = Arc::new(AlwaysFillsExecutor);
        let opp = opportunity();
        let (fills, failures) = fills_and_failures();
        let notifiers = Arc::new(NotifierRegistry::new());
        let state = Arc::new(AppState::new(RiskLimits::default()));

        let outcome =
            resolve_partial_fill(&executor, &opp, &fills, &failures, &notifiers, &state).await;

        assert!(matches!(outcome, HedgeOutcome::Completed));
        assert!(!state.is_quarantined("m"));
    }

    #[tokio::test]
    async fn unresolved_imbalance_quarantines_the_market() {
        let executor: Arc<dyn ArbitrageExecutor + Send + Sync> = Arc::new(AlwaysFailsExecutor);
        let opp = opportunity();
        let (fills, failures) = fills_and_failures();
        let notifiers = Arc::new(NotifierRegistry::new());
        let limits = RiskLimits {
            max_imbalance_ms: 20,
            ..RiskLimits::default()
        };
        let state = Arc::new(AppState::new(limits));

        let outcome =
            resolve_partial_fill(&executor, &opp, &fills, &failures, &notifiers, &state).await;

        assert!(matches!(outcome, HedgeOutcome::Unresolved));
        assert!(state.is_quarantined("m"));
    }
}

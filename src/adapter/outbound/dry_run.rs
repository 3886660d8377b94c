//! In-memory execution simulator for dry-run mode.
//!
//! Replaces the submit/cancel calls of a live exchange executor with an
//! instantaneous "ack" and a synthetic-latency "fill" at the reference
//! price. Everything upstream (risk checks, position tracking, stats,
//! notifications) runs through the exact same code path as live trading —
//! only the fill source differs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::domain::id::OrderId;
use crate::domain::idempotency::order_idempotency_key;
use crate::domain::opportunity::Opportunity;
use crate::domain::trade::{Fill, TradeResult};
use crate::error::Result;
use crate::port::outbound::exchange::{
    ArbitrageExecutor, ExecutionResult, OrderExecutor, OrderRequest,
};

/// Simulated executor used when no live exchange connection is desired.
///
/// Reports a fill for every leg after `fill_latency_ms` to approximate the
/// ack/fill timing a real venue would exhibit, without placing any orders.
pub struct DryRunExecutor {
    fill_latency_ms: u64,
    next_order_id: AtomicU64,
    /// Idempotency key -> previously assigned order id, so a retried leg of
    /// the same attempt gets back the same simulated fill instead of a new one.
    idempotency_cache: Mutex<HashMap<String, String>>,
}

impl DryRunExecutor {
    #[must_use]
    pub fn new(fill_latency_ms: u64) -> Self {
        Self {
            fill_latency_ms,
            next_order_id: AtomicU64::new(1),
            idempotency_cache: Mutex::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_order_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl OrderExecutor for DryRunExecutor {
    async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult> {
        info!(
            token_id = %order.token_id,
            side = ?order.side,
            price = %order.price,
            size = %order.size,
            "Dry-run: simulating single-leg order"
        );
        if self.fill_latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.fill_latency_ms)).await;
        }
        Ok(ExecutionResult::Success {
            order_id: OrderId::new(format!("dry-run-{}", self.next_id())),
            filled_amount: order.size,
            average_price: order.price,
        })
    }

    async fn cancel(&self, order_id: &OrderId) -> Result<()> {
        info!(order_id = %order_id, "Dry-run: simulated cancel");
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "dry-run"
    }
}

#[async_trait]
impl ArbitrageExecutor for DryRunExecutor {
    async fn execute_arbitrage(
        &self,
        opportunity: &Opportunity,
        attempt_id: i32,
    ) -> Result<TradeResult> {
        info!(
            market = %opportunity.market_id(),
            edge = %opportunity.edge(),
            volume = %opportunity.volume(),
            legs = opportunity.legs().len(),
            attempt_id,
            "Dry-run: simulating arbitrage execution"
        );

        if self.fill_latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.fill_latency_ms)).await;
        }

        let fills = opportunity
            .legs()
            .iter()
            .map(|leg| {
                let key = order_idempotency_key(opportunity.market_id(), leg.token_id(), attempt_id);
                let mut cache = self.idempotency_cache.lock();
                let order_id = cache
                    .entry(key)
                    .or_insert_with(|| format!("dry-run-{}", self.next_id()))
                    .clone();
                Fill::new(leg.token_id().clone(), order_id)
            })
            .collect();

        info!("Dry-run: simulated fill at reference price for all legs");
        Ok(TradeResult::Success { fills })
    }

    async fn cancel(&self, order_id: &OrderId) -> Result<()> {
        info!(order_id = %order_id, "Dry-run: simulated cancel");
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{MarketId, TokenId};
    use crate::domain::opportunity::OpportunityLeg;
    use rust_decimal_macros::dec;

    fn opportunity() -> Opportunity {
        Opportunity::new(
            MarketId::new("m1"),
            "Will it rain?",
            vec![
                OpportunityLeg::new(TokenId::new("up"), dec!(0.40)),
                OpportunityLeg::new(TokenId::new("down"), dec!(0.50)),
            ],
            dec!(100),
            dec!(1),
        )
    }

    #[tokio::test]
    async fn fills_every_leg() {
        let executor = DryRunExecutor::new(0);
        let result = executor.execute_arbitrage(&opportunity(), 1).await.unwrap();
        match result {
            TradeResult::Success { fills } => assert_eq!(fills.len(), 2),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn order_ids_are_unique_across_attempts() {
        let executor = DryRunExecutor::new(0);
        let first = executor.execute_arbitrage(&opportunity(), 1).await.unwrap();
        let second = executor.execute_arbitrage(&opportunity(), 2).await.unwrap();
        let (TradeResult::Success { fills: a }, TradeResult::Success { fills: b }) =
            (first, second)
        else {
            panic!("expected Success results");
        };
        assert_ne!(a[0].order_id, b[0].order_id);
    }

    #[tokio::test]
    async fn retrying_the_same_attempt_reuses_order_ids() {
        let executor = DryRunExecutor::new(0);
        let first = executor.execute_arbitrage(&opportunity(), 1).await.unwrap();
        let retry = executor.execute_arbitrage(&opportunity(), 1).await.unwrap();
        let (TradeResult::Success { fills: a }, TradeResult::Success { fills: b }) =
            (first, retry)
        else {
            panic!("expected Success results");
        };
        assert_eq!(a[0].order_id, b[0].order_id);
        assert_eq!(a[1].order_id, b[1].order_id);
    }

    #[tokio::test]
    async fn cancel_is_always_ok() {
        let executor = DryRunExecutor::new(0);
        assert!(executor.cancel(&OrderId::new("dry-run-1")).await.is_ok());
    }

    #[test]
    fn exchange_name_identifies_dry_run() {
        let executor = DryRunExecutor::new(0);
        assert_eq!(executor.exchange_name(), "dry-run");
    }
}

//! Position lifecycle management.
//!
//! Closes positions when their market settles (or an operator forces a
//! manual exit) and calculates realized PnL for the close.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::application::cache::position::PositionTracker;
use crate::domain::id::{MarketId, PositionId};
use crate::domain::position::Position;
use crate::domain::stats::TradeCloseEvent;
use crate::port::outbound::stats::StatsRecorder;

/// Why a position was closed.
#[derive(Debug, Clone)]
pub enum CloseReason {
    /// The underlying market resolved.
    Settlement {
        /// Name of the winning outcome.
        winning_outcome: String,
    },
    /// An operator forced the position closed outside normal settlement.
    Manual {
        /// Human-readable reason supplied by the operator.
        reason: String,
    },
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settlement { winning_outcome } => {
                write!(f, "settlement (winner: {winning_outcome})")
            }
            Self::Manual { reason } => write!(f, "manual ({reason})"),
        }
    }
}

/// Closes positions and records realized PnL.
pub struct PositionManager {
    stats: Arc<dyn StatsRecorder>,
}

impl PositionManager {
    /// Create a new position manager backed by the given stats recorder.
    #[must_use]
    pub fn new(stats: Arc<dyn StatsRecorder>) -> Self {
        Self { stats }
    }

    /// Calculate realized PnL for a settled arbitrage position.
    ///
    /// Every leg of a detected opportunity is sized identically (the
    /// opportunity's `volume`), so only one winning leg's worth of shares
    /// ever pays out; the rest settle at zero.
    #[must_use]
    pub fn calculate_arbitrage_pnl(position: &Position, payout_per_share: Decimal) -> Decimal {
        let size = position
            .legs()
            .first()
            .map_or(Decimal::ZERO, |leg| leg.size());
        let realized_payout = size * payout_per_share;
        realized_payout - position.entry_cost()
    }

    /// Close every open position in `market_id`, computing each position's
    /// PnL via `pnl_fn` and recording the close with the stats recorder.
    ///
    /// Returns the total realized PnL across all closed positions.
    pub fn close_all_for_market(
        &self,
        tracker: &mut PositionTracker,
        market_id: &MarketId,
        pnl_fn: impl Fn(&Position) -> Decimal,
        reason: CloseReason,
    ) -> Decimal {
        let ids: Vec<PositionId> = tracker
            .open_positions()
            .filter(|p| p.market_id() == market_id)
            .map(Position::id)
            .collect();

        let mut total_pnl = Decimal::ZERO;

        for id in ids {
            let Some(position) = tracker.get(id) else {
                continue;
            };
            let pnl = pnl_fn(position);
            let trade_id = position.trade_id();

            if let Some(realized) = tracker.close(id, pnl) {
                total_pnl += realized;

                info!(
                    position_id = %id,
                    market_id = %market_id,
                    pnl = %realized,
                    reason = %reason,
                    "Position closed"
                );

                if let Some(trade_id) = trade_id {
                    self.stats.record_trade_close(&TradeCloseEvent {
                        trade_id,
                        realized_profit: realized,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        total_pnl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::TokenId;
    use crate::domain::position::{PositionLeg, PositionStatus};
    use crate::adapter::outbound::stats::NullStatsRecorder;
    use rust_decimal_macros::dec;

    fn manager() -> PositionManager {
        PositionManager::new(Arc::new(NullStatsRecorder))
    }

    fn open_position(market_id: &str, leg_size: Decimal, entry_cost: Decimal) -> Position {
        Position::new(
            PositionId::new(1),
            MarketId::new(market_id),
            vec![PositionLeg::new(
                TokenId::new("token-up"),
                leg_size,
                dec!(0.40),
            )],
            entry_cost,
            dec!(100),
            chrono::Utc::now(),
            PositionStatus::Open,
        )
    }

    #[test]
    fn calculate_arbitrage_pnl_uses_winning_leg_size() {
        let position = open_position("m1", dec!(100), dec!(90));
        let pnl = PositionManager::calculate_arbitrage_pnl(&position, dec!(1));
        assert_eq!(pnl, dec!(10)); // 100 * 1 - 90
    }

    #[test]
    fn calculate_arbitrage_pnl_empty_legs_is_negative_entry_cost() {
        let position = Position::new(
            PositionId::new(1),
            MarketId::new("m1"),
            vec![],
            dec!(90),
            dec!(100),
            chrono::Utc::now(),
            PositionStatus::Open,
        );
        let pnl = PositionManager::calculate_arbitrage_pnl(&position, dec!(1));
        assert_eq!(pnl, dec!(-90));
    }

    #[test]
    fn close_all_for_market_closes_only_matching_market() {
        let mut tracker = PositionTracker::new();
        let id1 = tracker.next_id();
        tracker.add(Position::new(
            id1,
            MarketId::new("m1"),
            vec![PositionLeg::new(TokenId::new("t1"), dec!(100), dec!(0.4))],
            dec!(90),
            dec!(100),
            chrono::Utc::now(),
            PositionStatus::Open,
        ));
        let id2 = tracker.next_id();
        tracker.add(Position::new(
            id2,
            MarketId::new("m2"),
            vec![PositionLeg::new(TokenId::new("t2"), dec!(50), dec!(0.4))],
            dec!(45),
            dec!(50),
            chrono::Utc::now(),
            PositionStatus::Open,
        ));

        let manager = manager();
        let total = manager.close_all_for_market(
            &mut tracker,
            &MarketId::new("m1"),
            |pos| PositionManager::calculate_arbitrage_pnl(pos, dec!(1)),
            CloseReason::Settlement {
                winning_outcome: "Up".to_string(),
            },
        );

        assert_eq!(total, dec!(10));
        assert!(tracker.get(id1).unwrap().status().is_closed());
        assert!(tracker.get(id2).unwrap().status().is_open());
    }

    #[test]
    fn close_all_for_market_no_open_positions_returns_zero() {
        let mut tracker = PositionTracker::new();
        let manager = manager();

        let total = manager.close_all_for_market(
            &mut tracker,
            &MarketId::new("missing"),
            |pos| PositionManager::calculate_arbitrage_pnl(pos, dec!(1)),
            CloseReason::Manual {
                reason: "test".to_string(),
            },
        );

        assert_eq!(total, Decimal::ZERO);
    }
}

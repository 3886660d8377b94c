//! Per-leg maker/taker strategy selection for opportunity execution.
//!
//! Pure on the opportunity snapshot: given how much time remains until the
//! market resolves, picks a price and order style (maker/taker) for each
//! leg. Mirrors the tiered policy a human trader would apply by hand --
//! rest further from the touch when there's time for a maker fill, cross
//! the spread when there isn't.

use super::money::{Price, Volume};
use super::opportunity::Opportunity;
use super::TokenId;

/// Whether a leg should rest in the book (maker) or cross the spread
/// immediately (taker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    /// Post below the ask by one tick; not immediately marketable.
    Maker,
    /// Price at or above the ask; crosses the spread for an immediate fill.
    Taker,
}

/// The computed order parameters for one leg of an execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegOrderPlan {
    pub token_id: TokenId,
    pub kind: LegKind,
    pub price: Price,
    pub size: Volume,
}

/// Select a maker/taker plan for every leg of `opportunity`, given the
/// number of seconds until the market resolves.
///
/// Tiers (time-to-resolution `ttr`, seconds):
/// - `ttr > 120`: maker on every leg, posted one tick below the ask.
/// - `60 <= ttr <= 120`: hybrid -- the leg with the deeper ask size takes
///   maker; the other takes taker only if the edge clears twice the taker
///   fee, otherwise it also takes maker.
/// - `30 <= ttr < 60`: taker on every leg, priced at the ask.
/// - `ttr < 30` (including markets with no expiry attached): taker on every
///   leg with a wider slippage budget, priced one tick above the ask.
#[must_use]
pub fn plan_legs(opportunity: &Opportunity, now_unix: i64) -> Vec<LegOrderPlan> {
    let tick = opportunity.tick_size();
    let ttr = opportunity.time_to_resolution_secs(now_unix);

    match ttr {
        Some(ttr) if ttr > 120 => opportunity
            .legs()
            .iter()
            .map(|leg| LegOrderPlan {
                token_id: leg.token_id().clone(),
                kind: LegKind::Maker,
                price: leg.ask_price() - tick,
                size: leg.ask_size(),
            })
            .collect(),

        Some(ttr) if ttr >= 60 => {
            let legs = opportunity.legs();
            let deepest = legs
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.ask_size().cmp(&b.ask_size()))
                .map(|(idx, _)| idx);

            let taker_fee_reserve =
                Price::from(2u32) * opportunity.fee_bps_taker_price(opportunity.total_cost());
            let edge_clears_fee = opportunity.edge() > taker_fee_reserve;

            legs.iter()
                .enumerate()
                .map(|(idx, leg)| {
                    let is_deepest = Some(idx) == deepest;
                    let kind = if is_deepest || !edge_clears_fee {
                        LegKind::Maker
                    } else {
                        LegKind::Taker
                    };
                    let price = match kind {
                        LegKind::Maker => leg.ask_price() - tick,
                        LegKind::Taker => leg.ask_price(),
                    };
                    LegOrderPlan {
                        token_id: leg.token_id().clone(),
                        kind,
                        price,
                        size: leg.ask_size(),
                    }
                })
                .collect()
        }

        Some(ttr) if ttr >= 30 => opportunity
            .legs()
            .iter()
            .map(|leg| LegOrderPlan {
                token_id: leg.token_id().clone(),
                kind: LegKind::Taker,
                price: leg.ask_price(),
                size: leg.ask_size(),
            })
            .collect(),

        _ => opportunity
            .legs()
            .iter()
            .map(|leg| LegOrderPlan {
                token_id: leg.token_id().clone(),
                kind: LegKind::Taker,
                price: leg.ask_price() + tick,
                size: leg.ask_size(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::MarketId;
    use crate::domain::opportunity::OpportunityLeg;
    use rust_decimal_macros::dec;

    fn opportunity(expiry_ts: Option<i64>) -> Opportunity {
        let legs = vec![
            OpportunityLeg::new(TokenId::from("up"), dec!(0.40)).with_ask_size(dec!(100)),
            OpportunityLeg::new(TokenId::from("down"), dec!(0.50)).with_ask_size(dec!(50)),
        ];
        Opportunity::new(MarketId::from("m"), "q?", legs, dec!(50), dec!(1))
            .with_market_context(dec!(0.001), expiry_ts, 50)
    }

    #[test]
    fn far_from_expiry_is_maker_on_both_legs() {
        let opp = opportunity(Some(1_000_200));
        let plan = plan_legs(&opp, 1_000_000);
        assert!(plan.iter().all(|p| p.kind == LegKind::Maker));
        assert_eq!(plan[0].price, dec!(0.399));
    }

    #[test]
    fn hybrid_window_makes_deepest_leg_and_takes_the_rest_when_edge_clears_fee() {
        let opp = opportunity(Some(1_000_090));
        let plan = plan_legs(&opp, 1_000_000);
        // "up" has the deeper ask size (100 > 50) and must be maker.
        let up = plan.iter().find(|p| p.token_id.as_str() == "up").unwrap();
        assert_eq!(up.kind, LegKind::Maker);
    }

    #[test]
    fn close_to_expiry_is_taker_on_both_legs_at_ask() {
        let opp = opportunity(Some(1_000_040));
        let plan = plan_legs(&opp, 1_000_000);
        assert!(plan.iter().all(|p| p.kind == LegKind::Taker));
        let up = plan.iter().find(|p| p.token_id.as_str() == "up").unwrap();
        assert_eq!(up.price, dec!(0.40));
    }

    #[test]
    fn inside_final_window_takes_with_wider_slippage_budget() {
        let opp = opportunity(Some(1_000_020));
        let plan = plan_legs(&opp, 1_000_000);
        assert!(plan.iter().all(|p| p.kind == LegKind::Taker));
        let up = plan.iter().find(|p| p.token_id.as_str() == "up").unwrap();
        assert_eq!(up.price, dec!(0.401));
    }

    #[test]
    fn missing_expiry_defaults_to_taker_with_slippage_budget() {
        let opp = opportunity(None);
        let plan = plan_legs(&opp, 1_000_000);
        assert!(plan.iter().all(|p| p.kind == LegKind::Taker));
    }
}

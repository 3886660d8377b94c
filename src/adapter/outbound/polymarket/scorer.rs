//! Polymarket market scoring for subscription prioritization.
//!
//! Scores markets on five normalized factors before combining them per
//! [`PolymarketScoringConfig::weights`]. Liquidity and spread are currently
//! zero-weighted by default: the spread factor needs order book data this
//! scorer never sees (markets are scored from REST discovery, before any
//! book subscription exists), and liquidity is left disabled alongside it
//! until that data is wired through. See `PolymarketScoringConfig` for the
//! default weighting.

use async_trait::async_trait;

use crate::adapter::outbound::polymarket::settings::PolymarketScoringConfig;
use crate::domain::score::{MarketScore, ScoreWeights};
use crate::error::Result;
use crate::port::outbound::exchange::MarketInfo;
use crate::port::outbound::filter::MarketScorer;

/// Reference scale for normalizing USD liquidity/volume into `[0.0, 1.0]`.
///
/// Markets at or above this size score the maximum for that factor.
const NORMALIZATION_SCALE_USD: f64 = 50_000.0;

/// Priority scorer for Polymarket markets.
pub struct PolymarketScorer {
    weights: ScoreWeights,
    outcome_bonus_max: f64,
    outcome_bonus_binary: f64,
    outcome_bonus_three_to_five: f64,
    outcome_bonus_six_plus: f64,
}

impl PolymarketScorer {
    #[must_use]
    pub fn new(config: &PolymarketScoringConfig) -> Self {
        let outcome_bonus_max = config
            .outcome_bonus
            .binary
            .max(config.outcome_bonus.three_to_five)
            .max(config.outcome_bonus.six_plus)
            .max(f64::MIN_POSITIVE);

        Self {
            weights: ScoreWeights {
                liquidity: config.weights.liquidity,
                spread: config.weights.spread,
                opportunity: config.weights.opportunity,
                outcome_count: config.weights.outcome_count,
                activity: config.weights.activity,
            },
            outcome_bonus_max,
            outcome_bonus_binary: config.outcome_bonus.binary,
            outcome_bonus_three_to_five: config.outcome_bonus.three_to_five,
            outcome_bonus_six_plus: config.outcome_bonus.six_plus,
        }
    }

    fn normalize_usd(value: Option<f64>) -> f64 {
        (value.unwrap_or(0.0) / NORMALIZATION_SCALE_USD).clamp(0.0, 1.0)
    }

    /// Potential arbitrage edge: `1.0 - sum(outcome prices)`, normalized
    /// against a 10% edge as the practical ceiling. `0.0` when any outcome
    /// is missing a price, since the edge can't be computed without one.
    fn opportunity_factor(market: &MarketInfo) -> f64 {
        if market.outcomes.is_empty() || market.outcomes.iter().any(|o| o.price.is_none()) {
            return 0.0;
        }
        let total: f64 = market.outcomes.iter().filter_map(|o| o.price).sum();
        let edge = 1.0 - total;
        (edge / 0.10).clamp(0.0, 1.0)
    }

    fn outcome_count_factor(&self, market: &MarketInfo) -> f64 {
        let bonus = match market.outcomes.len() {
            0..=2 => self.outcome_bonus_binary,
            3..=5 => self.outcome_bonus_three_to_five,
            _ => self.outcome_bonus_six_plus,
        };
        (bonus / self.outcome_bonus_max).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl MarketScorer for PolymarketScorer {
    async fn score(&self, market: &MarketInfo) -> Result<MarketScore> {
        let liquidity = Self::normalize_usd(market.liquidity);
        let spread = 0.0;
        let opportunity = Self::opportunity_factor(market);
        let outcome_count = self.outcome_count_factor(market);
        let activity = Self::normalize_usd(market.volume_24h);

        Ok(MarketScore::new(
            &self.weights,
            liquidity,
            spread,
            opportunity,
            outcome_count,
            activity,
        ))
    }

    fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::exchange::OutcomeInfo;

    fn outcome(price: Option<f64>) -> OutcomeInfo {
        OutcomeInfo {
            token_id: "t".into(),
            name: "Yes".into(),
            price,
        }
    }

    fn market(outcomes: Vec<OutcomeInfo>, volume: Option<f64>, liquidity: Option<f64>) -> MarketInfo {
        MarketInfo {
            id: "m".into(),
            question: "q".into(),
            outcomes,
            active: true,
            volume_24h: volume,
            liquidity,
        }
    }

    #[tokio::test]
    async fn tighter_market_scores_higher_opportunity() {
        let scorer = PolymarketScorer::new(&PolymarketScoringConfig::default());
        let tight = market(vec![outcome(Some(0.48)), outcome(Some(0.48))], None, None);
        let wide = market(vec![outcome(Some(0.55)), outcome(Some(0.55))], None, None);

        let tight_score = scorer.score(&tight).await.unwrap();
        let wide_score = scorer.score(&wide).await.unwrap();

        assert!(tight_score.total() > wide_score.total());
    }

    #[tokio::test]
    async fn missing_price_yields_zero_opportunity() {
        let scorer = PolymarketScorer::new(&PolymarketScoringConfig::default());
        let no_price = market(vec![outcome(None), outcome(Some(0.5))], None, None);
        let score = scorer.score(&no_price).await.unwrap();
        assert_eq!(score.opportunity(), 0.0);
    }

    #[tokio::test]
    async fn binary_market_gets_binary_bonus() {
        let scorer = PolymarketScorer::new(&PolymarketScoringConfig::default());
        let binary = market(vec![outcome(Some(0.5)), outcome(Some(0.5))], None, None);
        let score = scorer.score(&binary).await.unwrap();
        assert!(score.outcome_count() > 0.0);
    }

    #[test]
    fn exchange_name_is_polymarket() {
        let scorer = PolymarketScorer::new(&PolymarketScoringConfig::default());
        assert_eq!(scorer.exchange_name(), "Polymarket");
    }
}

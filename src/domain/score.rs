//! Market scoring types used to prioritize subscription slots.
//!
//! Scores are a weighted blend of liquidity, spread, opportunity, outcome
//! count, and activity factors. Each factor is normalized to `[0.0, 1.0]`
//! before weighting so the weights alone determine relative importance.

/// Relative importance of each scoring factor.
///
/// Mirrors the exchange-specific scoring config (e.g.
/// `PolymarketScoringConfig::weights`), converted into a single
/// exchange-agnostic shape that [`MarketScore`] is computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight applied to the liquidity factor.
    pub liquidity: f64,
    /// Weight applied to the spread factor.
    pub spread: f64,
    /// Weight applied to the opportunity factor.
    pub opportunity: f64,
    /// Weight applied to the outcome-count factor.
    pub outcome_count: f64,
    /// Weight applied to the activity factor.
    pub activity: f64,
}

impl ScoreWeights {
    /// Sum of all weights, used to normalize a weighted total back to `[0, 1]`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.liquidity + self.spread + self.opportunity + self.outcome_count + self.activity
    }
}

/// Priority score computed for a single market.
///
/// Higher scores are subscribed first when subscription slots are limited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketScore {
    /// Final weighted score, normalized to `[0.0, 1.0]`.
    total: f64,
    /// Normalized liquidity factor contribution, before weighting.
    liquidity: f64,
    /// Normalized spread factor contribution, before weighting.
    spread: f64,
    /// Normalized opportunity factor contribution, before weighting.
    opportunity: f64,
    /// Normalized outcome-count factor contribution, before weighting.
    outcome_count: f64,
    /// Normalized activity factor contribution, before weighting.
    activity: f64,
}

impl MarketScore {
    /// Build a score from per-factor values (each expected in `[0.0, 1.0]`)
    /// and the weights used to combine them.
    #[must_use]
    pub fn new(
        weights: &ScoreWeights,
        liquidity: f64,
        spread: f64,
        opportunity: f64,
        outcome_count: f64,
        activity: f64,
    ) -> Self {
        let weighted = liquidity * weights.liquidity
            + spread * weights.spread
            + opportunity * weights.opportunity
            + outcome_count * weights.outcome_count
            + activity * weights.activity;
        let total_weight = weights.total();
        let total = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        Self {
            total,
            liquidity,
            spread,
            opportunity,
            outcome_count,
            activity,
        }
    }

    /// Final weighted, normalized score.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Normalized liquidity factor, before weighting.
    #[must_use]
    pub const fn liquidity(&self) -> f64 {
        self.liquidity
    }

    /// Normalized spread factor, before weighting.
    #[must_use]
    pub const fn spread(&self) -> f64 {
        self.spread
    }

    /// Normalized opportunity factor, before weighting.
    #[must_use]
    pub const fn opportunity(&self) -> f64 {
        self.opportunity
    }

    /// Normalized outcome-count factor, before weighting.
    #[must_use]
    pub const fn outcome_count(&self) -> f64 {
        self.outcome_count
    }

    /// Normalized activity factor, before weighting.
    #[must_use]
    pub const fn activity(&self) -> f64 {
        self.activity
    }
}

impl PartialOrd for MarketScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.total.partial_cmp(&other.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> ScoreWeights {
        ScoreWeights {
            liquidity: 0.0,
            spread: 0.0,
            opportunity: 0.5,
            outcome_count: 0.4,
            activity: 0.1,
        }
    }

    #[test]
    fn score_is_normalized_to_unit_interval() {
        let score = MarketScore::new(&weights(), 1.0, 1.0, 1.0, 1.0, 1.0);
        assert!((score.total() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_weight_factors_do_not_affect_total() {
        let score = MarketScore::new(&weights(), 0.0, 0.0, 1.0, 0.0, 0.0);
        assert!((score.total() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn all_zero_weights_yield_zero_total() {
        let zero = ScoreWeights {
            liquidity: 0.0,
            spread: 0.0,
            opportunity: 0.0,
            outcome_count: 0.0,
            activity: 0.0,
        };
        let score = MarketScore::new(&zero, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(score.total(), 0.0);
    }

    #[test]
    fn scores_are_orderable_by_total() {
        let low = MarketScore::new(&weights(), 0.0, 0.0, 0.1, 0.0, 0.0);
        let high = MarketScore::new(&weights(), 0.0, 0.0, 0.9, 0.0, 0.0);
        assert!(high > low);
    }
}

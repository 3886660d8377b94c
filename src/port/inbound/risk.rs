//! Risk check types for trade validation.
//!
//! Defines result types for risk management decisions. The actual risk
//! management logic lives in the adapter layer (`adapter::risk::RiskManager`).

use rust_decimal::Decimal;

use crate::error::RiskError;

/// Result of a risk check for a proposed trade.
///
/// Indicates whether a trade should proceed or be rejected based on risk
/// management rules.
#[derive(Debug, Clone)]
pub enum RiskCheckResult {
    /// Trade passes all risk checks and may proceed, sized down to the
    /// bankroll-approved volume (may equal the opportunity's detected volume
    /// if no sizing reduction was needed).
    Approved { approved_volume: Decimal },

    /// Trade is rejected due to a risk limit violation.
    Rejected(RiskError),
}

impl RiskCheckResult {
    /// Return `true` if the trade is approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, RiskCheckResult::Approved { .. })
    }

    /// Return the bankroll-sized volume the trade was approved for.
    ///
    /// Returns `None` if the trade was rejected.
    #[must_use]
    pub fn approved_volume(&self) -> Option<Decimal> {
        match self {
            RiskCheckResult::Approved { approved_volume } => Some(*approved_volume),
            RiskCheckResult::Rejected(_) => None,
        }
    }

    /// Return the rejection error if the trade was rejected.
    ///
    /// Returns `None` if the trade was approved.
    #[must_use]
    pub const fn rejection_error(&self) -> Option<&RiskError> {
        match self {
            RiskCheckResult::Rejected(e) => Some(e),
            RiskCheckResult::Approved { .. } => None,
        }
    }
}

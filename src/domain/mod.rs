//! Exchange-agnostic domain logic.

pub mod book;
pub mod execution_plan;
pub mod id;
pub mod idempotency;
pub mod market;
pub mod money;
pub mod opportunity;
pub mod position;
pub mod score;
pub mod stats;
pub mod trade;

// Core domain types
pub use book::{Book, PriceLevel};
pub use execution_plan::{LegKind, LegOrderPlan};
pub use id::{MarketId, OrderId, PositionId, TokenId};
pub use idempotency::order_idempotency_key;
pub use market::{DuplicateToken, Market, MarketPair, MarketRegistry, Outcome};
pub use money::{Price, Volume};
pub use opportunity::{Opportunity, OpportunityLeg};
pub use position::{Position, PositionLeg, PositionStatus};
pub use score::{MarketScore, ScoreWeights};
pub use stats::RecordedOpportunity;
pub use trade::{Fill, Failure, TradeResult};

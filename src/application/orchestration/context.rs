//! Detection context used by orchestration flow.
//!
//! Reuses the strategy layer's [`ConcreteDetectionContext`] rather than
//! duplicating the market/cache wiring here.

pub(crate) use crate::application::strategy::context::ConcreteDetectionContext as MarketDetectionContext;

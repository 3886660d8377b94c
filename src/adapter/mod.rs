//! Adapter layer split by direction.
//!
//! - `outbound`: driven adapters (exchange, notifier)

pub mod outbound;

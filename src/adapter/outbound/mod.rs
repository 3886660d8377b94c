//! Outbound adapters (driven side).

pub mod dry_run;
pub mod notifier;
pub mod polymarket;
pub mod stats;

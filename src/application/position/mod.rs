//! Position lifecycle management module.
//!
//! Provides services for managing positions from open to close, including
//! settlement handling and PnL calculation.

pub mod manager;

//! Risk management service module.
//!
//! Provides pre-execution validation and circuit breaker functionality
//! for controlling trading risk.

pub mod manager;

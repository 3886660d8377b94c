//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, connection management,
//! and runtime resource coordination.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`exchange`] - Connection pooling and exchange factory
//! - [`factory`] - Component factory functions
//! - [`orchestration`] - Runtime orchestration and composition root

pub mod config;
pub mod exchange;
pub mod factory;
pub mod orchestration;

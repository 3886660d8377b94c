//! Strategy registry factory.
//!
//! Provides factory functions for constructing the strategy registry
//! with configured detection strategies.

use tracing::warn;

use crate::application::strategy::registry::StrategyRegistry;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::strategy::StrategyEngine;

/// Build the strategy registry from configuration.
///
/// Creates a registry containing all enabled detection strategies as
/// specified in the configuration. Unknown strategy names are logged
/// and skipped.
pub fn build_strategy_registry(config: &Config) -> StrategyRegistry {
    let mut builder = StrategyRegistry::builder();

    for name in &config.strategies.enabled {
        let normalized = normalize_strategy_name(name);
        match normalized.as_str() {
            "single_condition" => {
                builder = builder.single_condition(config.strategies.single_condition.clone());
            }
            unknown => {
                warn!(
                    strategy = name,
                    normalized_strategy = unknown,
                    "Unknown strategy in config, skipping"
                );
            }
        }
    }

    builder.build()
}

fn normalize_strategy_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_registry_from_default_config() {
        let config = Config::default();
        let registry = build_strategy_registry(&config);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.strategy_names(), vec!["single_condition"]);
    }

    #[test]
    fn skips_unknown_strategy_names() {
        let mut config = Config::default();
        config.strategies.enabled = vec!["not-a-real-strategy".to_string()];
        let registry = build_strategy_registry(&config);
        assert!(registry.is_empty());
    }
}

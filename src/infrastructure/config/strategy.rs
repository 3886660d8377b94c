//! Strategy configuration for detection strategies.

use serde::Deserialize;

use crate::application::strategy::single_condition::SingleConditionConfig;

/// Configuration for all detection strategies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategiesConfig {
    /// Enabled strategy names.
    #[serde(default = "default_enabled_strategies")]
    pub enabled: Vec<String>,

    /// Single-condition (binary market) strategy config.
    #[serde(default)]
    pub single_condition: SingleConditionConfig,
}

fn default_enabled_strategies() -> Vec<String> {
    vec!["single_condition".to_string()]
}

//! Notifier registry factory.

use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};

/// Build the notifier registry from configuration.
///
/// Currently registers a [`LogNotifier`] unconditionally; additional
/// notification backends are registered here as they are added.
pub fn build_notifier_registry(_config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_notifier_registry_registers_log_notifier() {
        let config = Config::default();
        let registry = build_notifier_registry(&config);
        assert_eq!(registry.len(), 1);
    }
}

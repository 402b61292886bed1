//! Configuration seam for resolving the command source at dispatch time.

use std::collections::HashMap;

/// Primary key for the originating service name.
pub const SERVICE_NAME_KEY: &str = "outboxed.service_name";

/// Fallback key when [`SERVICE_NAME_KEY`] is not set.
pub const APPLICATION_NAME_KEY: &str = "application.name";

/// Read-only, side-effect-free configuration lookup.
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Resolve `key`, falling back to `fallback_key`.
    fn get_or(&self, key: &str, fallback_key: &str) -> Option<String> {
        self.get(key).or_else(|| self.get(fallback_key))
    }
}

/// Configuration backed by a plain map.
#[derive(Clone, Debug, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        MapConfig::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Configuration backed by the process environment.
///
/// Keys are normalized to environment-variable form: dots become
/// underscores and the result is uppercased, so `outboxed.service_name`
/// reads `OUTBOXED_SERVICE_NAME`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn new() -> Self {
        EnvConfig
    }

    fn normalize(key: &str) -> String {
        key.replace('.', "_").to_uppercase()
    }
}

impl ConfigProvider for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::normalize(key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_config_get() {
        let config = MapConfig::new().with(SERVICE_NAME_KEY, "billing");
        assert_eq!(config.get(SERVICE_NAME_KEY), Some("billing".to_string()));
        assert!(config.get(APPLICATION_NAME_KEY).is_none());
    }

    #[test]
    fn get_or_prefers_primary_key() {
        let config = MapConfig::new()
            .with(SERVICE_NAME_KEY, "billing")
            .with(APPLICATION_NAME_KEY, "acme-app");
        assert_eq!(
            config.get_or(SERVICE_NAME_KEY, APPLICATION_NAME_KEY),
            Some("billing".to_string())
        );
    }

    #[test]
    fn get_or_falls_back() {
        let config = MapConfig::new().with(APPLICATION_NAME_KEY, "acme-app");
        assert_eq!(
            config.get_or(SERVICE_NAME_KEY, APPLICATION_NAME_KEY),
            Some("acme-app".to_string())
        );
    }

    #[test]
    fn get_or_none_when_neither_set() {
        let config = MapConfig::new();
        assert!(config
            .get_or(SERVICE_NAME_KEY, APPLICATION_NAME_KEY)
            .is_none());
    }

    #[test]
    fn env_config_normalizes_keys() {
        std::env::set_var("OUTBOXED_TEST_SERVICE", "from-env");
        let config = EnvConfig::new();
        assert_eq!(
            config.get("outboxed.test_service"),
            Some("from-env".to_string())
        );
        std::env::remove_var("OUTBOXED_TEST_SERVICE");
    }
}

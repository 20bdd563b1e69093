//! Runtime Configuration
//!
//! Thin layer over environment variables with typed accessors and
//! explicit defaults. An overrides map sits in front of the process
//! environment so tests can pin values without touching global state.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Configuration lookup or parse failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required configuration key missing: {0}")]
    Missing(String),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Configuration source
///
/// Values are resolved from the overrides map first, then the process
/// environment. Empty values are treated as unset.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    overrides: HashMap<String, String>,
}

impl Settings {
    /// Settings backed by the process environment alone
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Pin a value ahead of the process environment
    pub fn with_override(mut self, key: &str, value: &str) -> Self {
        self.overrides.insert(key.to_string(), value.to_string());
        self
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    pub fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.lookup(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    pub fn u64(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.lookup(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn u32(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        match self.lookup(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.lookup(key) {
            None => Ok(default),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::Invalid {
                    key: key.to_string(),
                    value,
                }),
            },
        }
    }

    /// Duration expressed in hours
    pub fn duration_hours(&self, key: &str, default_hours: u64) -> Result<Duration, ConfigError> {
        Ok(Duration::from_secs(self.u64(key, default_hours)? * 3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_takes_precedence() {
        let settings = Settings::from_env().with_override("PLATFORM_TEST_KEY", "from-override");
        assert_eq!(
            settings.string("PLATFORM_TEST_KEY", "default"),
            "from-override"
        );
    }

    #[test]
    fn test_default_when_unset() {
        let settings = Settings::from_env();
        assert_eq!(
            settings.string("PLATFORM_TEST_UNSET_KEY", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_empty_value_is_unset() {
        let settings = Settings::from_env().with_override("PLATFORM_TEST_EMPTY", "  ");
        assert_eq!(settings.string("PLATFORM_TEST_EMPTY", "fallback"), "fallback");
        assert!(settings.require("PLATFORM_TEST_EMPTY").is_err());
    }

    #[test]
    fn test_require_missing() {
        let settings = Settings::from_env();
        let err = settings.require("PLATFORM_TEST_MISSING").unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_numeric_parsing() {
        let settings = Settings::from_env()
            .with_override("PLATFORM_TEST_NUM", "42")
            .with_override("PLATFORM_TEST_BAD", "not-a-number");

        assert_eq!(settings.u64("PLATFORM_TEST_NUM", 7).unwrap(), 42);
        assert_eq!(settings.u64("PLATFORM_TEST_OTHER", 7).unwrap(), 7);
        assert!(settings.u64("PLATFORM_TEST_BAD", 7).is_err());
    }

    #[test]
    fn test_bool_parsing() {
        let settings = Settings::from_env()
            .with_override("A", "true")
            .with_override("B", "0")
            .with_override("C", "banana");

        assert!(settings.bool("A", false).unwrap());
        assert!(!settings.bool("B", true).unwrap());
        assert!(settings.bool("C", false).is_err());
        assert!(settings.bool("D", true).unwrap());
    }

    #[test]
    fn test_duration_hours() {
        let settings = Settings::from_env().with_override("PLATFORM_TEST_HOURS", "24");
        assert_eq!(
            settings.duration_hours("PLATFORM_TEST_HOURS", 1).unwrap(),
            Duration::from_secs(86400)
        );
    }
}

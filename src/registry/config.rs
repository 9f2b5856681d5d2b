/*!
 * Registry Configuration
 *
 * In-process settings with environment overrides
 */

use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Name used in log output
    pub name: String,
    /// Log a warning when disposal targets an id that is not live
    pub warn_on_redundant_dispose: bool,
    /// Warn when a single component holds more live resources than this
    pub leak_warning_threshold: Option<usize>,
    /// Release leftover resources when the last registry handle drops
    pub dispose_on_drop: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            warn_on_redundant_dispose: false,
            leak_warning_threshold: None,
            dispose_on_drop: true,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by environment variables
    ///
    /// - LIFECYCLE_REGISTRY_NAME
    /// - LIFECYCLE_WARN_REDUNDANT (1/true)
    /// - LIFECYCLE_LEAK_THRESHOLD (positive integer)
    /// - LIFECYCLE_DISPOSE_ON_DROP (1/true, 0/false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("LIFECYCLE_REGISTRY_NAME").filter(|n| !n.is_empty()) {
            config.name = name;
        }
        if let Some(flag) = lookup("LIFECYCLE_WARN_REDUNDANT").and_then(|v| parse_flag(&v)) {
            config.warn_on_redundant_dispose = flag;
        }
        if let Some(raw) = lookup("LIFECYCLE_LEAK_THRESHOLD") {
            match raw.trim().parse::<usize>() {
                Ok(threshold) if threshold > 0 => config.leak_warning_threshold = Some(threshold),
                _ => tracing::warn!(value = %raw, "Ignoring invalid LIFECYCLE_LEAK_THRESHOLD"),
            }
        }
        if let Some(flag) = lookup("LIFECYCLE_DISPOSE_ON_DROP").and_then(|v| parse_flag(&v)) {
            config.dispose_on_drop = flag;
        }

        config
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_redundant_dispose_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_redundant_dispose = enabled;
        self
    }

    pub fn with_leak_warning_threshold(mut self, threshold: usize) -> Self {
        self.leak_warning_threshold = Some(threshold);
        self
    }

    pub fn with_dispose_on_drop(mut self, enabled: bool) -> Self {
        self.dispose_on_drop = enabled;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

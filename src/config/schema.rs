//! Configuration schema definitions.
//!
//! This module defines the dispatch engine's configuration structure. All
//! types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine-wide configuration.
///
/// The engine keeps its live copy behind an atomic pointer swap, so a
/// replacement is last-write-wins with respect to in-flight requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub address: String,

    /// Default per-request timeout in milliseconds. Zero disables the
    /// deadline.
    pub timeout_ms: u64,

    /// Connection read budget in milliseconds.
    pub read_timeout_ms: u64,

    /// Connection write budget in milliseconds.
    pub write_timeout_ms: u64,

    /// Maximum buffered request body size in bytes.
    pub max_request_body: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            timeout_ms: 30_000,
            read_timeout_ms: 10_000,
            write_timeout_ms: 30_000,
            max_request_body: 1 << 20,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Per-route configuration override.
///
/// When present on a route it replaces the engine defaults wholesale; it
/// is not merged field by field. A `timeout_ms` of zero therefore
/// disables the deadline for that route even when the engine default is
/// bounded.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteOverrides {
    /// Per-request timeout in milliseconds. Zero disables the deadline.
    pub timeout_ms: u64,

    /// Maximum buffered request body size in bytes.
    pub max_request_body: usize,
}

impl RouteOverrides {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: EngineConfig = toml::from_str("timeout_ms = 5000").unwrap();
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.address, "0.0.0.0:8080");
        assert_eq!(config.max_request_body, 1 << 20);
    }

    #[test]
    fn test_timeout_accessors() {
        let config = EngineConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));

        let overrides = RouteOverrides {
            timeout_ms: 3_000,
            max_request_body: 64,
        };
        assert_eq!(overrides.timeout(), Duration::from_secs(3));
    }
}

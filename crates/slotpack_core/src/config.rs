//! # Pool Configuration
//!
//! Capacity tuning for pools, loadable from the engine's TOML config files.

use serde::{Deserialize, Serialize};

use crate::handle::MAX_SLOTS;

/// Initial capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 512;

/// Capacity configuration for an object pool.
///
/// `initial_capacity` is both the number of slots backed by storage at
/// construction and the increment by which the pool grows when it runs out.
/// `max_capacity` is the hard ceiling on live objects; it can only lower
/// the encoding limit [`MAX_SLOTS`], never raise it.
///
/// Both fields default when absent, so a TOML fragment like
/// `initial_capacity = 64` is a complete configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Slots backed by storage at construction; also the growth increment.
    pub initial_capacity: usize,
    /// Hard ceiling on live objects. At most [`MAX_SLOTS`].
    pub max_capacity: usize,
}

impl PoolConfig {
    /// Creates a configuration with the given initial capacity and the
    /// encoding-limit ceiling.
    #[inline]
    #[must_use]
    pub const fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: MAX_SLOTS,
        }
    }

    /// Creates a configuration with explicit initial capacity and ceiling.
    #[inline]
    #[must_use]
    pub const fn bounded(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_capacity: MAX_SLOTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.initial_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.max_capacity, MAX_SLOTS);
    }

    #[test]
    fn test_config_from_toml() {
        let config: PoolConfig = toml::from_str("initial_capacity = 64").unwrap();
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.max_capacity, MAX_SLOTS);

        let config: PoolConfig =
            toml::from_str("initial_capacity = 8\nmax_capacity = 32").unwrap();
        assert_eq!(config, PoolConfig::bounded(8, 32));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = PoolConfig::bounded(128, 4096);
        let text = toml::to_string(&config).unwrap();
        let parsed: PoolConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}

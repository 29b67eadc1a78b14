//! Construction-time configuration surface.
//!
//! No environment variables are read by the core; the host application
//! sources its own config and builds a [`CoreConfig`] to inject.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheTtls;
use crate::llm::{Strategy, UnhealthyThresholds};

/// Every construction-time knob the core recognizes, with design defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(with = "duration_secs")]
    pub selection_ttl: Duration,
    #[serde(with = "duration_secs")]
    pub content_ttl: Duration,
    #[serde(with = "duration_secs")]
    pub step_ttl: Duration,
    #[serde(with = "duration_secs")]
    pub cleanup_interval: Duration,
    pub router_strategy: RouterStrategyConfig,
    pub min_failures_before_unhealthy: u64,
    pub max_success_rate_before_unhealthy: f64,
}

/// Serializable mirror of [`Strategy`] for embedding in a host config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterStrategyConfig {
    #[default]
    Priority,
    RoundRobin,
    Random,
}

impl From<RouterStrategyConfig> for Strategy {
    fn from(value: RouterStrategyConfig) -> Self {
        match value {
            RouterStrategyConfig::Priority => Strategy::Priority,
            RouterStrategyConfig::RoundRobin => Strategy::RoundRobin,
            RouterStrategyConfig::Random => Strategy::Random,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            selection_ttl: Duration::from_secs(5 * 60),
            content_ttl: Duration::from_secs(10 * 60),
            step_ttl: Duration::from_secs(15 * 60),
            cleanup_interval: Duration::from_secs(60),
            router_strategy: RouterStrategyConfig::default(),
            min_failures_before_unhealthy: crate::llm::health::DEFAULT_MIN_FAILURES,
            max_success_rate_before_unhealthy: crate::llm::health::DEFAULT_MAX_SUCCESS_RATE,
        }
    }
}

impl CoreConfig {
    #[must_use]
    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            selection: self.selection_ttl,
            content: self.content_ttl,
            step: self.step_ttl,
        }
    }

    #[must_use]
    pub fn unhealthy_thresholds(&self) -> UnhealthyThresholds {
        UnhealthyThresholds {
            min_failures: self.min_failures_before_unhealthy,
            max_success_rate: self.max_success_rate_before_unhealthy,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

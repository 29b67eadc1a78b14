//! Builder for [`crate::AdaptiveCore`].
//!
//! Mirrors the teacher's `with_*` accumulation + `build()` shape, adapted to
//! the knobs this crate actually has: a [`CoreConfig`] and an ordered set of
//! provider registrations.

use std::sync::Arc;

use crate::AdaptiveCore;
use crate::cache::MultiLayerCache;
use crate::config::CoreConfig;
use crate::llm::{LlmProvider, LlmRouter};

struct Registration {
    kind: String,
    provider: Arc<dyn LlmProvider>,
    priority: i32,
}

/// Accumulates provider registrations and a [`CoreConfig`], then builds an
/// [`AdaptiveCore`] with its cache sweeper already running.
#[derive(Default)]
pub struct AdaptiveCoreBuilder {
    config: Option<CoreConfig>,
    registrations: Vec<Registration>,
}

impl AdaptiveCoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_provider(
        mut self,
        kind: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
        priority: i32,
    ) -> Self {
        self.registrations.push(Registration {
            kind: kind.into(),
            provider,
            priority,
        });
        self
    }

    /// Builds the core: constructs the cache and router, registers every
    /// accumulated provider, and starts the cache sweeper.
    #[must_use]
    pub fn build(self) -> AdaptiveCore {
        let config = self.config.unwrap_or_default();
        let cache = MultiLayerCache::new(config.cache_ttls());
        let router = Arc::new(LlmRouter::new(config.unhealthy_thresholds()));
        router.set_strategy(config.router_strategy.into());

        for registration in self.registrations {
            router.register_provider(
                registration.kind,
                registration.provider,
                registration.priority,
            );
        }

        let cleanup_handle = cache.start_cleanup(config.cleanup_interval);

        AdaptiveCore {
            cache,
            router,
            cleanup_handle,
        }
    }
}

//! Adaptive Core
//!
//! The serving core of an adaptive learning backend: a multi-layer content
//! cache (selection, content, step, block) plus a failover-aware LLM
//! router (priority, round-robin, random strategies; per-provider health
//! tracking; tier-aware model rewriting).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use adaptive_core::{AdaptiveCoreBuilder, CoreConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let core = AdaptiveCoreBuilder::new()
//!         .with_config(CoreConfig::default())
//!         .build();
//!
//!     let stats = core.cache().stats();
//!     println!("selection hit rate: {:.2}", stats.selection_hit_rate());
//! }
//! ```

use std::sync::Arc;

pub mod builder;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;

pub use builder::AdaptiveCoreBuilder;
pub use cache::{CacheStats, MultiLayerCache};
pub use config::CoreConfig;
pub use error::{CacheError, RouterError};
pub use llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, LlmRouter, Strategy};

// Re-export async_trait for implementors of `LlmProvider`.
pub use async_trait::async_trait;

/// Top-level entry point: owns the cache and the router, and keeps the
/// cache sweeper alive for as long as the core itself lives.
pub struct AdaptiveCore {
    cache: Arc<MultiLayerCache>,
    router: Arc<LlmRouter>,
    cleanup_handle: tokio::task::JoinHandle<()>,
}

impl AdaptiveCore {
    /// The multi-layer content cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<MultiLayerCache> {
        &self.cache
    }

    /// The failover-aware LLM router.
    #[must_use]
    pub fn router(&self) -> &Arc<LlmRouter> {
        &self.router
    }
}

impl Drop for AdaptiveCore {
    fn drop(&mut self) {
        self.cleanup_handle.abort();
    }
}

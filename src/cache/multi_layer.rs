//! Composes the selection, content, step, and block caches into one façade
//! with independent TTLs, atomic hit/miss metrics, and layered invalidation.
//!
//! Modeled on `CacheManager`'s stats/hit-rate bookkeeping, generalized from
//! one L1/L2 pair to four independent, equally-weighted layers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::cache::fingerprint::{content_key, selection_key};
use crate::cache::generic::GenericCache;
use crate::cache::typed::{BlockCache, StepCache};
use crate::domain::{Block, CourseState, PreparedStep, ToolSelection};

/// TTLs for the three keyed layers (step and block share the config's step TTL).
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub selection: Duration,
    pub content: Duration,
    pub step: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            selection: Duration::from_secs(5 * 60),
            content: Duration::from_secs(10 * 60),
            step: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    selection_hits: AtomicU64,
    selection_misses: AtomicU64,
    content_hits: AtomicU64,
    content_misses: AtomicU64,
    step_hits: AtomicU64,
    step_misses: AtomicU64,
    block_hits: AtomicU64,
    block_misses: AtomicU64,
    speculative_hits: AtomicU64,
}

#[allow(clippy::cast_precision_loss)]
fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Snapshot of every layer's hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub selection_hits: u64,
    pub selection_misses: u64,
    pub content_hits: u64,
    pub content_misses: u64,
    pub step_hits: u64,
    pub step_misses: u64,
    pub block_hits: u64,
    pub block_misses: u64,
    pub speculative_hits: u64,
}

impl CacheStats {
    #[must_use]
    pub fn selection_hit_rate(&self) -> f64 {
        hit_rate(self.selection_hits, self.selection_misses)
    }

    #[must_use]
    pub fn content_hit_rate(&self) -> f64 {
        hit_rate(self.content_hits, self.content_misses)
    }
}

/// The serving core's memoization façade: selection cache, content cache,
/// step cache, block cache, each on its own lock, sharing no state besides
/// the atomic counters.
pub struct MultiLayerCache {
    selection: GenericCache<ToolSelection>,
    content: GenericCache<serde_json::Value>,
    step: StepCache,
    block: BlockCache,
    counters: Counters,
}

impl MultiLayerCache {
    #[must_use]
    pub fn new(ttls: CacheTtls) -> Arc<Self> {
        Arc::new(Self {
            selection: GenericCache::new("selection", ttls.selection),
            content: GenericCache::new("content", ttls.content),
            step: StepCache::new(ttls.step),
            block: BlockCache::new(ttls.step),
            counters: Counters::default(),
        })
    }

    /// Starts a single periodic sweeper covering every layer. Intended to be
    /// called once, at construction time, by the owning [`crate::AdaptiveCore`].
    pub fn start_cleanup(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                this.selection.cleanup().await;
                this.content.cleanup().await;
                this.step.cleanup().await;
                this.block.cleanup().await;
            }
        })
    }

    pub async fn get_selection(&self, state: &CourseState) -> Option<ToolSelection> {
        let key = selection_key(
            &state.course_id,
            &crate::cache::fingerprint::context_hash(state),
        );
        let result = self.selection.get(&key).await;
        match &result {
            Some(_) => self.counters.selection_hits.fetch_add(1, Ordering::Relaxed),
            None => self
                .counters
                .selection_misses
                .fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    pub async fn set_selection(&self, state: &CourseState, selection: ToolSelection) {
        let key = selection_key(
            &state.course_id,
            &crate::cache::fingerprint::context_hash(state),
        );
        self.selection.set(key, selection).await;
    }

    pub async fn get_content(
        &self,
        course_id: &str,
        tool_type: &str,
        topic_hash: &str,
    ) -> Option<serde_json::Value> {
        let key = content_key(course_id, tool_type, topic_hash);
        let result = self.content.get(&key).await;
        match &result {
            Some(_) => {
                self.counters.content_hits.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .speculative_hits
                    .fetch_add(1, Ordering::Relaxed);
            }
            None => {
                self.counters.content_misses.fetch_add(1, Ordering::Relaxed);
            }
        }
        result
    }

    pub async fn set_content(
        &self,
        course_id: &str,
        tool_type: &str,
        topic_hash: &str,
        value: serde_json::Value,
    ) {
        let key = content_key(course_id, tool_type, topic_hash);
        self.content.set(key, value).await;
    }

    pub async fn get_step(&self, course_id: &str, user_id: &str) -> Option<PreparedStep> {
        let result = self.step.get(course_id, user_id).await;
        match &result {
            Some(_) => self.counters.step_hits.fetch_add(1, Ordering::Relaxed),
            None => self.counters.step_misses.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    pub async fn set_step(&self, course_id: &str, user_id: &str, step: PreparedStep) {
        self.step.set(course_id, user_id, step).await;
    }

    pub async fn get_block(
        &self,
        course_id: &str,
        lesson_id: &str,
        block_id: &str,
    ) -> Option<Block> {
        let result = self.block.get(course_id, lesson_id, block_id).await;
        match &result {
            Some(_) => self.counters.block_hits.fetch_add(1, Ordering::Relaxed),
            None => self.counters.block_misses.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    pub async fn set_block(&self, course_id: &str, lesson_id: &str, block_id: &str, block: Block) {
        self.block.set(course_id, lesson_id, block_id, block).await;
    }

    /// Invalidates every selection cached for `course_id`.
    pub async fn invalidate_selection(&self, course_id: &str) -> usize {
        self.selection
            .delete_by_prefix(&format!("select:{course_id}:"))
            .await
    }

    /// Invalidates every content entry cached for `(course_id, tool_type)`.
    pub async fn invalidate_content_for_tool(&self, course_id: &str, tool_type: &str) -> usize {
        self.content
            .delete_by_prefix(&format!("content:{course_id}:{tool_type}:"))
            .await
    }

    /// Invalidates every content entry cached for `course_id`, across all tools.
    pub async fn invalidate_content_for_course(&self, course_id: &str) -> usize {
        self.content
            .delete_by_prefix(&format!("content:{course_id}:"))
            .await
    }

    /// On learner progress within a course: drop selection and the cached
    /// step, but keep content (it's often still reusable after one step).
    pub async fn invalidate_for_progress(&self, course_id: &str, user_id: &str) {
        self.invalidate_selection(course_id).await;
        self.step.delete(course_id, user_id).await;
        debug!(
            course_id,
            user_id, "invalidated selection and step after progress"
        );
    }

    /// Full course invalidation: selection, all content, and the step.
    pub async fn invalidate_course(&self, course_id: &str, user_id: &str) {
        self.invalidate_selection(course_id).await;
        self.invalidate_content_for_course(course_id).await;
        self.step.delete(course_id, user_id).await;
        debug!(course_id, user_id, "invalidated entire course");
    }

    pub async fn clear(&self) {
        self.selection.clear().await;
        self.content.clear().await;
        self.step.clear().await;
        self.block.clear().await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            selection_hits: self.counters.selection_hits.load(Ordering::Relaxed),
            selection_misses: self.counters.selection_misses.load(Ordering::Relaxed),
            content_hits: self.counters.content_hits.load(Ordering::Relaxed),
            content_misses: self.counters.content_misses.load(Ordering::Relaxed),
            step_hits: self.counters.step_hits.load(Ordering::Relaxed),
            step_misses: self.counters.step_misses.load(Ordering::Relaxed),
            block_hits: self.counters.block_hits.load(Ordering::Relaxed),
            block_misses: self.counters.block_misses.load(Ordering::Relaxed),
            speculative_hits: self.counters.speculative_hits.load(Ordering::Relaxed),
        }
    }
}

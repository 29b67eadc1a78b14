//! Narrow, single-purpose façades over [`GenericCache`] that fix the value
//! type and compose structured keys, so callers cannot store the wrong shape
//! under the wrong key form.

use std::time::Duration;

use crate::cache::fingerprint::{block_key, step_key};
use crate::cache::generic::GenericCache;
use crate::domain::{Block, PreparedStep};

/// Caches pre-generated steps keyed by `(courseID, userID)`.
pub struct StepCache {
    inner: GenericCache<PreparedStep>,
}

impl StepCache {
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: GenericCache::new("step", default_ttl),
        }
    }

    pub async fn get(&self, course_id: &str, user_id: &str) -> Option<PreparedStep> {
        self.inner.get(&step_key(course_id, user_id)).await
    }

    pub async fn set(&self, course_id: &str, user_id: &str, step: PreparedStep) {
        self.inner.set(step_key(course_id, user_id), step).await;
    }

    pub async fn delete(&self, course_id: &str, user_id: &str) {
        self.inner.delete(&step_key(course_id, user_id)).await;
    }

    pub async fn cleanup(&self) -> usize {
        self.inner.cleanup().await
    }

    pub async fn size(&self) -> usize {
        self.inner.size().await
    }

    pub async fn clear(&self) {
        self.inner.clear().await;
    }
}

/// Caches pre-generated lesson blocks keyed by `(courseID, lessonID, blockID)`.
pub struct BlockCache {
    inner: GenericCache<Block>,
}

impl BlockCache {
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: GenericCache::new("block", default_ttl),
        }
    }

    pub async fn get(&self, course_id: &str, lesson_id: &str, block_id: &str) -> Option<Block> {
        self.inner
            .get(&block_key(course_id, lesson_id, block_id))
            .await
    }

    pub async fn set(&self, course_id: &str, lesson_id: &str, block_id: &str, block: Block) {
        self.inner
            .set(block_key(course_id, lesson_id, block_id), block)
            .await;
    }

    pub async fn delete(&self, course_id: &str, lesson_id: &str, block_id: &str) {
        self.inner
            .delete(&block_key(course_id, lesson_id, block_id))
            .await;
    }

    pub async fn cleanup(&self) -> usize {
        self.inner.cleanup().await
    }

    pub async fn size(&self) -> usize {
        self.inner.size().await
    }

    pub async fn clear(&self) {
        self.inner.clear().await;
    }
}

//! SHA-256 fingerprinting and cache-key formatting.
//!
//! Grounded in the `cache_key()` pattern from the `vex` LLM cache wrapper:
//! hash a canonical concatenation of fields, truncate, hex-encode.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::domain::CourseState;
use crate::error::CacheError;

/// How many of the most recent steps influence the context hash. Tuned so
/// the hash reacts to the learner's current trajectory while staying stable
/// against edits to older history (see `context_hash`).
const TAIL_WINDOW: usize = 3;

fn short_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(8).fold(String::new(), |mut hex, b| {
        let _ = write!(hex, "{b:02x}");
        hex
    })
}

/// Fingerprint of the course state that drives tool-selection caching.
///
/// Sensitive to: the compaction summary, weaknesses, step count, the last
/// [`TAIL_WINDOW`] steps, and progress. Stable against edits to steps older
/// than the tail window, so selection cache entries survive early-session
/// history mutation.
#[must_use]
pub fn context_hash(state: &CourseState) -> String {
    let mut canonical = String::new();

    if let Some(memory) = &state.memory {
        if let Some(summary) = &memory.summary {
            canonical.push_str(summary);
        }
        if !memory.weaknesses.is_empty() {
            canonical.push_str(&memory.weaknesses.join(","));
        }
    }

    canonical.push_str("steps:");
    canonical.push_str(&state.steps.len().to_string());

    let tail_start = state.steps.len().saturating_sub(TAIL_WINDOW);
    for step in state.steps.get(tail_start..).unwrap_or_default() {
        canonical.push_str(step.kind.as_str());
        canonical.push_str(&step.topic);
    }

    canonical.push_str("progress:");
    canonical.push_str(&state.progress.to_string());

    short_hex(&canonical)
}

/// Alternate context-hash variant for courses modeled by a structural
/// outline (sections/lessons/position) rather than a step sequence. Kept
/// distinct from [`context_hash`] so the two historical variants can never
/// be silently conflated at a call site; see the design notes on this.
#[must_use]
pub fn context_hash_outline(
    section_count: usize,
    lesson_count: usize,
    section_index: usize,
    lesson_index: usize,
) -> String {
    let canonical =
        format!("sections:{section_count}lessons:{lesson_count}pos:{section_index}:{lesson_index}");
    short_hex(&canonical)
}

/// Fingerprint of a topic within a course, used for content-cache keys.
/// Prefers per-topic confidence when available, otherwise falls back to
/// overall course progress.
#[must_use]
pub fn topic_hash(state: &CourseState, topic: &str) -> String {
    let mut canonical = topic.to_string();

    let confidence = state
        .memory
        .as_ref()
        .and_then(|m| m.topics.get(topic))
        .and_then(|t| t.confidence);

    match confidence {
        Some(confidence) => {
            let _ = write!(canonical, "conf:{confidence:.2}");
        }
        None => {
            let _ = write!(canonical, "progress:{}", state.progress);
        }
    }

    short_hex(&canonical)
}

/// Builds the `select:{courseID}:{contextHash}` key.
#[must_use]
pub fn selection_key(course_id: &str, context_hash: &str) -> String {
    format!("select:{course_id}:{context_hash}")
}

/// Parses a selection key back into `(courseID, contextHash)`.
///
/// # Errors
///
/// Returns [`CacheError::KeyParseFailure`] if `key` doesn't have the
/// `select:` prefix or doesn't split into exactly two segments after it.
pub fn parse_selection_key(key: &str) -> Result<(String, String), CacheError> {
    let rest = key
        .strip_prefix("select:")
        .ok_or_else(|| CacheError::KeyParseFailure(key.to_string(), "selection"))?;
    let parts: Vec<&str> = rest.split(':').collect();
    match parts.as_slice() {
        [course_id, hash] => Ok(((*course_id).to_string(), (*hash).to_string())),
        _ => Err(CacheError::KeyParseFailure(key.to_string(), "selection")),
    }
}

/// Builds the `content:{courseID}:{toolType}:{topicHash}` key.
#[must_use]
pub fn content_key(course_id: &str, tool_type: &str, topic_hash: &str) -> String {
    format!("content:{course_id}:{tool_type}:{topic_hash}")
}

/// Parses a content key back into `(courseID, toolType, topicHash)`.
///
/// # Errors
///
/// Returns [`CacheError::KeyParseFailure`] if `key` doesn't have the
/// `content:` prefix or doesn't split into exactly three segments after it.
pub fn parse_content_key(key: &str) -> Result<(String, String, String), CacheError> {
    let rest = key
        .strip_prefix("content:")
        .ok_or_else(|| CacheError::KeyParseFailure(key.to_string(), "content"))?;
    let parts: Vec<&str> = rest.split(':').collect();
    match parts.as_slice() {
        [course_id, tool_type, hash] => Ok((
            (*course_id).to_string(),
            (*tool_type).to_string(),
            (*hash).to_string(),
        )),
        _ => Err(CacheError::KeyParseFailure(key.to_string(), "content")),
    }
}

/// Builds the `step:{courseID}:{userID}` key.
#[must_use]
pub fn step_key(course_id: &str, user_id: &str) -> String {
    format!("step:{course_id}:{user_id}")
}

/// Parses a step key back into `(courseID, userID)`.
///
/// # Errors
///
/// Returns [`CacheError::KeyParseFailure`] if `key` doesn't have the
/// `step:` prefix or doesn't split into exactly two segments after it.
pub fn parse_step_key(key: &str) -> Result<(String, String), CacheError> {
    let rest = key
        .strip_prefix("step:")
        .ok_or_else(|| CacheError::KeyParseFailure(key.to_string(), "step"))?;
    let parts: Vec<&str> = rest.split(':').collect();
    match parts.as_slice() {
        [course_id, user_id] => Ok(((*course_id).to_string(), (*user_id).to_string())),
        _ => Err(CacheError::KeyParseFailure(key.to_string(), "step")),
    }
}

/// Builds the untagged `{courseID}:{lessonID}:{blockID}` key.
#[must_use]
pub fn block_key(course_id: &str, lesson_id: &str, block_id: &str) -> String {
    format!("{course_id}:{lesson_id}:{block_id}")
}

/// Parses a block key back into `(courseID, lessonID, blockID)`.
///
/// # Errors
///
/// Returns [`CacheError::KeyParseFailure`] if `key` doesn't split into
/// exactly three colon-delimited segments.
pub fn parse_block_key(key: &str) -> Result<(String, String, String), CacheError> {
    let parts: Vec<&str> = key.split(':').collect();
    match parts.as_slice() {
        [course_id, lesson_id, block_id] => Ok((
            (*course_id).to_string(),
            (*lesson_id).to_string(),
            (*block_id).to_string(),
        )),
        _ => Err(CacheError::KeyParseFailure(key.to_string(), "block")),
    }
}

//! Error taxonomy for the cache and router subsystems.
//!
//! Cache misses are not errors (see [`crate::cache::generic::GenericCache::get`]);
//! only malformed keys and router exhaustion are represented here.

use thiserror::Error;

/// Failures from parsing or composing cache keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A key did not match the expected grammar for its kind.
    #[error("key parse failure: {0:?} is not a valid {1} key")]
    KeyParseFailure(String, &'static str),
}

/// Failures from the LLM router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A single provider call failed.
    #[error("provider {provider} call failed: {reason}")]
    ProviderCallError { provider: String, reason: String },

    /// Every provider attempted for this request failed.
    #[error("all providers exhausted, last error from {last_provider}: {source}")]
    RouterExhausted {
        last_provider: String,
        #[source]
        source: Box<RouterError>,
    },

    /// No provider is currently marked available.
    #[error("no healthy providers available")]
    NoHealthyProviders,
}

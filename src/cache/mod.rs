//! Multi-layer content cache: generic TTL storage, typed façades,
//! fingerprinting, and the composed façade callers actually use.

pub mod fingerprint;
pub mod generic;
pub mod multi_layer;
pub mod typed;

pub use fingerprint::{context_hash, context_hash_outline, topic_hash};
pub use generic::GenericCache;
pub use multi_layer::{CacheStats, CacheTtls, MultiLayerCache};
pub use typed::{BlockCache, StepCache};

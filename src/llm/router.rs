//! Failover-aware LLM router.
//!
//! Registers providers under a priority order, selects one per
//! [`Strategy`], rewrites the model name for the requested tier, and
//! updates the provider's health record after every call. See
//! `nearai-ironclaw`'s `llm::failover::FailoverProvider` for the
//! try-each-provider-in-sequence shape this generalizes.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use rand::seq::SliceRandom;

use crate::error::RouterError;
use crate::llm::health::{Health, HealthSnapshot};
use crate::llm::provider::{ChatRequest, ChatResponse, LlmProvider};

/// Opaque tag identifying a registered provider (e.g. `"openai"`, `"anthropic"`).
pub type ProviderKind = String;

/// Selection strategy the router uses to pick among healthy providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Try providers in ascending priority order; first success wins.
    #[default]
    Priority,
    /// Advance a shared counter and try providers cyclically from there.
    RoundRobin,
    /// Try providers in a freshly shuffled order.
    Random,
}

struct ProviderEntry {
    provider: Arc<dyn LlmProvider>,
    priority: i32,
    health: Arc<Health>,
}

struct RouterState {
    providers: HashMap<ProviderKind, ProviderEntry>,
    ordered: Vec<ProviderKind>,
    strategy: Strategy,
}

/// Thresholds that decide when a provider's health trips to unavailable.
#[derive(Debug, Clone, Copy)]
pub struct UnhealthyThresholds {
    pub min_failures: u64,
    pub max_success_rate: f64,
}

impl Default for UnhealthyThresholds {
    fn default() -> Self {
        Self {
            min_failures: crate::llm::health::DEFAULT_MIN_FAILURES,
            max_success_rate: crate::llm::health::DEFAULT_MAX_SUCCESS_RATE,
        }
    }
}

/// Routes chat-completion requests across registered providers with
/// failover, tier-aware model rewriting, and per-provider health tracking.
pub struct LlmRouter {
    state: RwLock<RouterState>,
    round_robin: AtomicU64,
    thresholds: UnhealthyThresholds,
}

impl LlmRouter {
    #[must_use]
    pub fn new(thresholds: UnhealthyThresholds) -> Self {
        Self {
            state: RwLock::new(RouterState {
                providers: HashMap::new(),
                ordered: Vec::new(),
                strategy: Strategy::default(),
            }),
            round_robin: AtomicU64::new(0),
            thresholds,
        }
    }

    /// Registers (or replaces) a provider under `kind` with the given
    /// dispatch priority (lower value = tried first under [`Strategy::Priority`]).
    pub fn register_provider(
        &self,
        kind: ProviderKind,
        provider: Arc<dyn LlmProvider>,
        priority: i32,
    ) {
        let mut state = self.state.write();
        state.providers.insert(
            kind,
            ProviderEntry {
                provider,
                priority,
                health: Arc::new(Health::default()),
            },
        );
        let mut ordered: Vec<ProviderKind> = state.providers.keys().cloned().collect();
        ordered.sort_by_key(|k| state.providers.get(k).map_or(i32::MAX, |e| e.priority));
        state.ordered = ordered;
    }

    pub fn set_strategy(&self, strategy: Strategy) {
        self.state.write().strategy = strategy;
    }

    pub fn strategy(&self) -> Strategy {
        self.state.read().strategy
    }

    pub fn provider_count(&self) -> usize {
        self.state.read().providers.len()
    }

    pub fn healthy_provider_count(&self) -> usize {
        self.state
            .read()
            .providers
            .values()
            .filter(|e| e.health.is_available())
            .count()
    }

    pub fn health(&self) -> HashMap<ProviderKind, HealthSnapshot> {
        self.state
            .read()
            .providers
            .iter()
            .map(|(k, e)| (k.clone(), e.health.snapshot()))
            .collect()
    }

    pub fn reset_health(&self, kind: &str) {
        if let Some(entry) = self.state.read().providers.get(kind) {
            entry.health.reset();
        }
    }

    pub fn mark_available(&self, kind: &str, available: bool) {
        if let Some(entry) = self.state.read().providers.get(kind) {
            entry.health.set_available(available);
        }
    }

    /// Equivalent to `complete_with_tier(request, "free")`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NoHealthyProviders`] if no registered provider
    /// is currently healthy, or [`RouterError::RouterExhausted`] if every
    /// healthy candidate was tried and failed.
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RouterError> {
        self.complete_with_tier(request, "free").await
    }

    /// Selects a provider per the current strategy, rewrites the model for
    /// `tier`, and dispatches. Fails over to the next candidate on error.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NoHealthyProviders`] if no registered provider
    /// is currently healthy, or [`RouterError::RouterExhausted`] if every
    /// healthy candidate was tried and failed.
    pub async fn complete_with_tier(
        &self,
        request: ChatRequest,
        tier: &str,
    ) -> Result<ChatResponse, RouterError> {
        let (strategy, candidates) = {
            let state = self.state.read();
            let healthy: Vec<ProviderKind> = state
                .ordered
                .iter()
                .filter(|k| {
                    state
                        .providers
                        .get(*k)
                        .is_some_and(|e| e.health.is_available())
                })
                .cloned()
                .collect();
            (state.strategy, healthy)
        };

        if candidates.is_empty() {
            return Err(RouterError::NoHealthyProviders);
        }

        let order = self.attempt_order(strategy, &candidates);

        let mut last: Option<(ProviderKind, RouterError)> = None;
        for kind in order {
            match self.call_provider(&kind, &request, tier).await {
                Ok(response) => return Ok(response),
                Err(err) => last = Some((kind, err)),
            }
        }

        // `candidates` was non-empty, so at least one attempt ran.
        last.map_or(
            Err(RouterError::NoHealthyProviders),
            |(last_provider, source)| {
                Err(RouterError::RouterExhausted {
                    last_provider,
                    source: Box::new(source),
                })
            },
        )
    }

    fn attempt_order(&self, strategy: Strategy, candidates: &[ProviderKind]) -> Vec<ProviderKind> {
        match strategy {
            Strategy::Priority => candidates.to_vec(),
            Strategy::RoundRobin => {
                let start = usize::try_from(self.round_robin.fetch_add(1, Ordering::Relaxed))
                    .unwrap_or(0)
                    % candidates.len();
                candidates
                    .iter()
                    .cycle()
                    .skip(start)
                    .take(candidates.len())
                    .cloned()
                    .collect()
            }
            Strategy::Random => {
                let mut shuffled = candidates.to_vec();
                shuffled.shuffle(&mut rand::thread_rng());
                shuffled
            }
        }
    }

    async fn call_provider(
        &self,
        kind: &ProviderKind,
        request: &ChatRequest,
        tier: &str,
    ) -> Result<ChatResponse, RouterError> {
        let (provider, health, original_model) = {
            let state = self.state.read();
            let entry =
                state
                    .providers
                    .get(kind)
                    .ok_or_else(|| RouterError::ProviderCallError {
                        provider: kind.clone(),
                        reason: "provider was removed before dispatch".to_string(),
                    })?;
            (
                Arc::clone(&entry.provider),
                Arc::clone(&entry.health),
                request.model.clone(),
            )
        };

        let mut attempt = request.clone();
        attempt.model = model_for_provider(kind, tier, &original_model);

        let start = Instant::now();
        let result = provider.complete(attempt).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(response) => {
                health.record_success(latency_ms);
                Ok(response)
            }
            Err(err) => {
                health.record_failure(
                    &err.to_string(),
                    self.thresholds.min_failures,
                    self.thresholds.max_success_rate,
                );
                tracing::warn!(provider = %kind, error = %err, "provider call failed");
                Err(err)
            }
        }
    }
}

/// Pure tier-to-model rewrite. Never changes request intent, only physical
/// routing: a tier it doesn't recognize passes `model` through unchanged.
#[must_use]
pub fn model_for_provider(provider: &str, tier: &str, model: &str) -> String {
    if model == "mini" && provider == "openai" {
        match tier {
            "free" => return "mini-nano".to_string(),
            "pro" => return "mini-full".to_string(),
            _ => {}
        }
    }
    model.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ChatMessage;
    use std::sync::atomic::AtomicU32;

    struct MockProvider {
        name: String,
        fail: bool,
        calls: AtomicU32,
    }

    impl MockProvider {
        fn succeeding(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail: false,
                calls: AtomicU32::new(0),
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail: true,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RouterError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                Err(RouterError::ProviderCallError {
                    provider: self.name.clone(),
                    reason: "boom".to_string(),
                })
            } else {
                Ok(ChatResponse {
                    content: format!("reply from {}", self.name),
                    model: request.model,
                    input_tokens: 1,
                    output_tokens: 1,
                })
            }
        }
    }

    fn request() -> ChatRequest {
        ChatRequest::new("gpt", vec![ChatMessage::user("hi")])
    }

    #[tokio::test]
    async fn priority_fails_over_to_next_provider() {
        let router = LlmRouter::new(UnhealthyThresholds::default());
        router.register_provider("p1".into(), MockProvider::failing("p1"), 1);
        router.register_provider("p2".into(), MockProvider::succeeding("p2"), 2);

        let response = router.complete(request()).await.unwrap();
        assert_eq!(response.content, "reply from p2");

        let health = router.health();
        assert_eq!(health["p1"].failure_count, 1);
        assert_eq!(health["p2"].success_count, 1);
        assert!(health["p1"].available);
        assert!(health["p2"].available);
    }

    #[tokio::test]
    async fn no_healthy_providers_fails_immediately() {
        let router = LlmRouter::new(UnhealthyThresholds::default());
        let err = router.complete(request()).await.unwrap_err();
        assert!(matches!(err, RouterError::NoHealthyProviders));
    }

    #[tokio::test]
    async fn all_providers_fail_reports_last_cause() {
        let router = LlmRouter::new(UnhealthyThresholds::default());
        router.register_provider("p1".into(), MockProvider::failing("p1"), 1);
        router.register_provider("p2".into(), MockProvider::failing("p2"), 2);

        let err = router.complete(request()).await.unwrap_err();
        match err {
            RouterError::RouterExhausted { last_provider, .. } => {
                assert_eq!(last_provider, "p2");
            }
            other => panic!("expected RouterExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn round_robin_distributes_across_providers() {
        let router = LlmRouter::new(UnhealthyThresholds::default());
        router.set_strategy(Strategy::RoundRobin);
        router.register_provider("p1".into(), MockProvider::succeeding("p1"), 1);
        router.register_provider("p2".into(), MockProvider::succeeding("p2"), 2);
        router.register_provider("p3".into(), MockProvider::succeeding("p3"), 3);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..9 {
            let response = router.complete(request()).await.unwrap();
            let provider = response
                .content
                .trim_start_matches("reply from ")
                .to_string();
            *counts.entry(provider).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 3);
        for count in counts.values() {
            assert_eq!(*count, 3);
        }
    }

    #[tokio::test]
    async fn unhealthy_provider_trips_after_six_failures() {
        let router = LlmRouter::new(UnhealthyThresholds::default());
        router.register_provider("p1".into(), MockProvider::failing("p1"), 1);

        for _ in 0..6 {
            let _ = router.complete(request()).await;
        }
        assert_eq!(router.healthy_provider_count(), 0);

        router.reset_health("p1");
        assert_eq!(router.healthy_provider_count(), 1);
    }

    #[test]
    fn model_rewrite_is_tier_aware() {
        assert_eq!(model_for_provider("openai", "free", "mini"), "mini-nano");
        assert_eq!(model_for_provider("openai", "pro", "mini"), "mini-full");
        assert_eq!(model_for_provider("openai", "pro", "other"), "other");
        assert_eq!(model_for_provider("openai", "unknown-tier", "mini"), "mini");
    }
}

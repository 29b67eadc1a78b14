//! Provider abstraction and failover router for chat-completion calls.

pub mod health;
pub mod provider;
pub mod router;

pub use health::{Health, HealthSnapshot};
pub use provider::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, Role};
pub use router::{LlmRouter, ProviderKind, Strategy, UnhealthyThresholds};

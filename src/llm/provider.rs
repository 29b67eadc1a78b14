//! Chat-completion provider contract.
//!
//! A provider is anything able to take a [`ChatRequest`] and return a
//! [`ChatResponse`]. The router never inspects message content; it only
//! rewrites `model` before dispatch (see [`crate::llm::router`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// Role of a message in a chat-completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat-completion request.
///
/// `model` is mutable by design: the router rewrites it per-tier before
/// handing the request to a provider.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
    pub n: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 1.0,
            max_tokens: 1024,
            top_p: None,
            n: None,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    #[must_use]
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }
}

/// The provider's reply. Only the primary completion is modeled; streaming
/// partial responses are out of scope.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A chat-completion backend the router can dispatch to.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Perform one chat completion.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RouterError>;
}

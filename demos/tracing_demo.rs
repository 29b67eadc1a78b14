//! Minimal end-to-end run with tracing wired up, the way a host binary
//! embedding this crate would initialize its own subscriber.
//!
//! Run with `RUST_LOG=debug cargo run --example tracing_demo`.

use std::sync::Arc;

use adaptive_core::error::RouterError;
use adaptive_core::llm::{ChatRequest, ChatResponse, LlmProvider};
use adaptive_core::{AdaptiveCoreBuilder, ChatMessage};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

struct Echo;

#[async_trait]
impl LlmProvider for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RouterError> {
        Ok(ChatResponse {
            content: request
                .messages
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            model: request.model,
            input_tokens: 1,
            output_tokens: 1,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    tracing::info!("starting adaptive-core demo");

    let core = AdaptiveCoreBuilder::new()
        .with_provider("echo", Arc::new(Echo), 1)
        .build();

    let response = core
        .router()
        .complete(ChatRequest::new("gpt", vec![ChatMessage::user("ping")]))
        .await?;

    tracing::info!(content = %response.content, "router responded");
    Ok(())
}

use crate::error::AppError;
use async_trait::async_trait;

/// Defines the public interface for an LLM (Large Language Model) actor.
///
/// Lets the dispatcher run against the remote API in production and a mock in tests.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Sends `prompt` as a single user message and returns the reply text.
    async fn complete(&self, prompt: String) -> Result<String, AppError>;
}

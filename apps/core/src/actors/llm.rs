use crate::actors::messages::LlmMessage;
use crate::actors::traits::LlmActor;
use crate::config::LlmConfig;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

// --- Constants ---
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);
const HANDLE_TIMEOUT: Duration = Duration::from_secs(130);
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.7;
/// Characters of an error body kept in the error message.
const ERROR_BODY_PREVIEW: usize = 150;
/// Returned when the API answers with no content.
pub const EMPTY_COMPLETION: &str = "(пустой ответ)";

/// A handle to the `LlmActor`.
///
/// Cloneable front for the actor task that talks to the chat-completions API.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
}

impl LlmActorHandle {
    /// Spawns the actor task and returns a handle to it.
    pub fn new(config: LlmConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = LlmActorRunner::new(receiver, config);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn complete(&self, prompt: String) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Complete {
            prompt,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(HANDLE_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    client: Client,
    config: LlmConfig,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, config: LlmConfig) -> Self {
        Self {
            receiver,
            client: Client::new(),
            config,
        }
    }

    async fn run(mut self) {
        info!("LlmActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("LlmActor stopped");
    }

    async fn handle_message(&self, msg: LlmMessage) {
        match msg {
            LlmMessage::Complete { prompt, responder } => {
                let result = self.complete_chat(&prompt).await;
                if let Err(e) = &result {
                    error!("Completion failed: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    async fn complete_chat(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("DeepSeek API key is not configured".to_string()))?;

        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let request_future = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send();

        let res = timeout(COMPLETION_TIMEOUT, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(AppError::Llm(format!("API: {} {}", status.as_u16(), preview)));
        }

        let body: ChatResponse = res.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        debug!(content_chars = content.chars().count(), "Completion received");

        if content.is_empty() {
            Ok(EMPTY_COMPLETION.to_string())
        } else {
            Ok(content)
        }
    }
}

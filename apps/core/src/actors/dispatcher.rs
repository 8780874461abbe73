use crate::actors::llm::{LlmActorHandle, COMPLETION_TIMEOUT};
use crate::actors::messages::DispatcherMessage;
use crate::actors::traits::LlmActor;
use crate::commands::{Command, COUNT_USAGE, HELP_TEXT, PROMPT_USAGE, WELCOME_TEXT};
use crate::config::{AppConfig, Backend};
use crate::database;
use crate::engine::{self, EngineError};
use crate::error::AppError;
use crate::models::{HistoryEntry, UserSettings, MAX_REQUEST_COUNT};
use crate::prompt::{fill_template, DEFAULT_PROMPT};
use crate::rate_limiter::RateLimiter;
use chrono::{DateTime, Local};
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Enough for a full run of LLM requests.
const INPUT_TIMEOUT: Duration = COMPLETION_TIMEOUT.saturating_mul(MAX_REQUEST_COUNT as u32 + 1);
/// Entries shown by `/history`.
const HISTORY_LIMIT: i64 = 10;
/// Characters of request and result text shown per history entry.
const HISTORY_PREVIEW_CHARS: usize = 50;
/// Idle rate-limiter entries are dropped every this many inputs.
const PRUNE_EVERY: u64 = 256;

/// Options the dispatcher takes from [`AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DispatcherSettings {
    pub backend: Backend,
    pub rate_limit: usize,
    pub rate_window: Duration,
}

impl From<&AppConfig> for DispatcherSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            backend: config.backend,
            rate_limit: config.rate_limit,
            rate_window: config.rate_window,
        }
    }
}

/// A handle to the dispatcher actor.
///
/// Entry point for chat input: parses commands, keeps per-user exclude words,
/// runs the configured backend and records history.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::Sender<DispatcherMessage>,
}

impl DispatcherHandle {
    /// Spawns the dispatcher with a real LLM client built from `config`.
    pub fn new(config: &AppConfig, db_pool: Option<SqlitePool>) -> Self {
        let llm = Arc::new(LlmActorHandle::new(config.llm.clone()));
        Self::with_llm(llm, db_pool, DispatcherSettings::from(config))
    }

    /// Spawns the dispatcher around any [`LlmActor`].
    pub fn with_llm<L: LlmActor>(
        llm: Arc<L>,
        db_pool: Option<SqlitePool>,
        settings: DispatcherSettings,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let runner = DispatcherRunner::new(receiver, llm, db_pool, settings);
        tokio::spawn(async move { runner.run().await });
        Self { sender }
    }

    /// Handles one line of chat input and returns the reply text.
    #[instrument(skip(self, input), fields(request_id = %Uuid::new_v4()))]
    pub async fn handle_input(&self, user_id: String, input: String) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = DispatcherMessage::HandleInput {
            user_id,
            input,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(INPUT_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Asks the dispatcher loop to stop after the queued inputs.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(DispatcherMessage::Shutdown).await;
    }
}

/// In-memory state of one chat.
#[derive(Debug, Default)]
struct ChatSession {
    exclude_words: Option<String>,
}

// --- Actor Runner ---
struct DispatcherRunner<L: LlmActor> {
    receiver: mpsc::Receiver<DispatcherMessage>,
    llm: Arc<L>,
    db_pool: Option<SqlitePool>,
    settings: DispatcherSettings,
    sessions: HashMap<String, ChatSession>,
    limiter: RateLimiter,
    handled: u64,
}

impl<L: LlmActor> DispatcherRunner<L> {
    fn new(
        receiver: mpsc::Receiver<DispatcherMessage>,
        llm: Arc<L>,
        db_pool: Option<SqlitePool>,
        settings: DispatcherSettings,
    ) -> Self {
        Self {
            receiver,
            llm,
            db_pool,
            limiter: RateLimiter::new(settings.rate_limit, settings.rate_window),
            settings,
            sessions: HashMap::new(),
            handled: 0,
        }
    }

    async fn run(mut self) {
        info!(backend = ?self.settings.backend, "Dispatcher started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DispatcherMessage::HandleInput {
                    user_id,
                    input,
                    responder,
                } => {
                    let result = self.handle_input(&user_id, &input).await;
                    if let Err(e) = &result {
                        warn!(user_id = %user_id, "Input failed: {}", e);
                    }
                    let _ = responder.send(result);
                }
                DispatcherMessage::Shutdown => break,
            }
        }
        info!("Dispatcher stopped");
    }

    async fn handle_input(&mut self, user_id: &str, input: &str) -> Result<String, AppError> {
        self.handled += 1;
        if self.handled % PRUNE_EVERY == 0 {
            self.limiter.prune();
        }

        let command = Command::parse(input);
        debug!(?command, "Parsed input");

        match command {
            Command::Start => Ok(WELCOME_TEXT.to_string()),
            Command::Help => Ok(HELP_TEXT.to_string()),
            Command::Empty => Err(EngineError::EmptyInput.into()),
            Command::Exclude(words) => {
                let reply = format!(
                    "Слова для исключения установлены:\n{}\n\nТеперь отправь текст для обработки.",
                    words
                );
                self.session(user_id).exclude_words = Some(words);
                Ok(reply)
            }
            Command::Clear => {
                self.session(user_id).exclude_words = None;
                Ok("Настройки очищены. Слова для исключения удалены.".to_string())
            }
            Command::Prompt(Some(template)) => {
                database::update_user_prompt(self.pool()?, user_id, Some(&template)).await?;
                Ok("Промпт установлен. В нём можно использовать переменные {text} и {exc}.".to_string())
            }
            Command::Prompt(None) => Ok(PROMPT_USAGE.to_string()),
            Command::Count(Some(raw)) => {
                let count = database::update_user_count(self.pool()?, user_id, &raw).await?;
                Ok(format!("Количество запросов подряд: {}", count))
            }
            Command::Count(None) => Ok(COUNT_USAGE.to_string()),
            Command::History => {
                let entries =
                    database::get_user_history(self.pool()?, user_id, HISTORY_LIMIT).await?;
                Ok(format_history(&entries))
            }
            Command::Process(text) => self.process_text(user_id, &text).await,
            Command::Unknown(name) => Ok(format!("Неизвестная команда {}. Набери /help.", name)),
        }
    }

    fn session(&mut self, user_id: &str) -> &mut ChatSession {
        self.sessions.entry(user_id.to_string()).or_default()
    }

    fn pool(&self) -> Result<&SqlitePool, AppError> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| AppError::Config("Database not initialized".to_string()))
    }

    async fn load_settings(&self, user_id: &str) -> Result<UserSettings, AppError> {
        let settings = match &self.db_pool {
            Some(pool) => database::get_user_settings(pool, user_id).await?,
            None => UserSettings::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Runs the backend `request_count` times and records every result.
    async fn process_text(&mut self, user_id: &str, text: &str) -> Result<String, AppError> {
        if !self.limiter.check(user_id) {
            return Err(AppError::RateLimited);
        }

        let exclude_words = self
            .sessions
            .get(user_id)
            .and_then(|s| s.exclude_words.clone());
        let settings = self.load_settings(user_id).await?;

        let mut results = Vec::with_capacity(settings.request_count as usize);
        for run in 1..=settings.request_count {
            let result = match self.settings.backend {
                Backend::Shuffle => {
                    engine::process(text, exclude_words.as_deref().unwrap_or(""))?.into_text()
                }
                Backend::Llm => {
                    let template = settings.prompt_template.as_deref().unwrap_or(DEFAULT_PROMPT);
                    let prompt = fill_template(template, text, exclude_words.as_deref());
                    self.llm.complete(prompt).await?
                }
            };

            if let Some(pool) = &self.db_pool {
                if let Err(e) =
                    database::save_request(pool, user_id, text, exclude_words.as_deref(), &result)
                        .await
                {
                    error!("Failed to save request: {}", e);
                }
            }

            debug!(run, "Request completed");
            results.push(result);
        }

        Ok(format_results(&results))
    }
}

fn format_results(results: &[String]) -> String {
    match results {
        [single] => format!("Результат:\n\n{}", single),
        many => {
            let blocks: Vec<String> = many
                .iter()
                .enumerate()
                .map(|(i, r)| format!("--- {} ---\n{}", i + 1, r))
                .collect();
            format!("Результаты ({}):\n\n{}", many.len(), blocks.join("\n\n"))
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > HISTORY_PREVIEW_CHARS {
        let head: String = text.chars().take(HISTORY_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "История запросов пуста.".to_string();
    }

    let mut out = String::from("История запросов (за последние 7 дней):\n\n");
    for (i, entry) in entries.iter().enumerate() {
        let date = DateTime::from_timestamp(entry.created_at, 0)
            .map(|d| d.with_timezone(&Local).format("%d.%m.%Y, %H:%M:%S").to_string())
            .unwrap_or_default();
        out.push_str(&format!("{}. {}\n", i + 1, date));
        out.push_str(&format!("   Запрос: {}\n", preview(&entry.request_text)));
        if let Some(exclude) = &entry.exclude_words {
            out.push_str(&format!("   Исключено: {}\n", exclude));
        }
        out.push_str(&format!("   Результат: {}\n\n", preview(&entry.result_text)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(request: &str, exclude: Option<&str>, result: &str) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            user_id: "42".to_string(),
            request_text: request.to_string(),
            exclude_words: exclude.map(str::to_string),
            result_text: result.to_string(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_format_single_result() {
        assert_eq!(format_results(&["мир как".to_string()]), "Результат:\n\nмир как");
    }

    #[test]
    fn test_format_many_results() {
        let out = format_results(&["a".to_string(), "b".to_string()]);
        assert_eq!(out, "Результаты (2):\n\n--- 1 ---\na\n\n--- 2 ---\nb");
    }

    #[test]
    fn test_preview_truncates_by_characters() {
        let long = "я".repeat(60);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), HISTORY_PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("коротко"), "коротко");
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&[]), "История запросов пуста.");

        let out = format_history(&[
            entry("Привет мир", Some("привет"), "мир"),
            entry("раз два", None, "два раз"),
        ]);
        assert!(out.starts_with("История запросов (за последние 7 дней):\n\n1. "));
        assert!(out.contains("   Запрос: Привет мир\n   Исключено: привет\n   Результат: мир\n"));
        assert!(out.contains("2. "));
        assert_eq!(out.matches("Исключено").count(), 1);
    }
}

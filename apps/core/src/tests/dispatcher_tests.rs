//! Dispatcher Tests
//!
//! Chat flows through the dispatcher actor with a mock LLM and a temporary
//! history database.

use crate::actors::dispatcher::{DispatcherHandle, DispatcherSettings};
use crate::actors::traits::LlmActor;
use crate::commands::{COUNT_USAGE, HELP_TEXT, PROMPT_USAGE};
use crate::config::Backend;
use crate::database;
use crate::engine::ALL_EXCLUDED_MESSAGE;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Mock LLM
// ============================================================================

/// Records every prompt and answers with a fixed reply.
#[derive(Default)]
pub struct MockLlm {
    pub reply: String,
    pub should_fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmActor for MockLlm {
    async fn complete(&self, prompt: String) -> Result<String, AppError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt);
        }
        if self.should_fail {
            Err(AppError::Llm("API: 500 mock failure".to_string()))
        } else {
            Ok(self.reply.clone())
        }
    }
}

fn settings(backend: Backend) -> DispatcherSettings {
    DispatcherSettings {
        backend,
        rate_limit: 20,
        rate_window: Duration::from_secs(60),
    }
}

async fn create_test_pool() -> (TempDir, SqlitePool) {
    let dir = tempdir().expect("Failed to create temp dir");
    let pool = database::init_db(&dir.path().join("history.sqlite"))
        .await
        .expect("Failed to initialize database");
    (dir, pool)
}

async fn send(dispatcher: &DispatcherHandle, user: &str, input: &str) -> Result<String, AppError> {
    dispatcher
        .handle_input(user.to_string(), input.to_string())
        .await
}

#[cfg(test)]
mod command_tests {
    use super::*;

    #[tokio::test]
    async fn test_help_and_unknown() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::new("")), None, settings(Backend::Shuffle));

        assert_eq!(send(&dispatcher, "1", "/help").await.expect("help"), HELP_TEXT);
        assert_eq!(
            send(&dispatcher, "1", "/frobnicate").await.expect("unknown"),
            "Неизвестная команда /frobnicate. Набери /help."
        );
        assert_eq!(send(&dispatcher, "1", "/prompt").await.expect("usage"), PROMPT_USAGE);
        assert_eq!(send(&dispatcher, "1", "/count abc").await.expect("usage"), COUNT_USAGE);

        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::new("")), None, settings(Backend::Shuffle));

        let err = send(&dispatcher, "1", "   ").await.expect_err("should fail");
        assert_eq!(err.to_string(), "Текст не может быть пустым");
    }

    #[tokio::test]
    async fn test_settings_need_database() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::new("")), None, settings(Backend::Shuffle));

        let err = send(&dispatcher, "1", "/prompt Перепиши {text}")
            .await
            .expect_err("should fail without database");
        assert!(matches!(err, AppError::Config(_)));

        let err = send(&dispatcher, "1", "/history")
            .await
            .expect_err("should fail without database");
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_count_is_clamped_in_reply() {
        let (_dir, pool) = create_test_pool().await;
        let dispatcher = DispatcherHandle::with_llm(
            Arc::new(MockLlm::new("")),
            Some(pool),
            settings(Backend::Shuffle),
        );

        let reply = send(&dispatcher, "1", "/count 99").await.expect("count");
        assert_eq!(reply, "Количество запросов подряд: 10");
    }
}

#[cfg(test)]
mod shuffle_backend_tests {
    use super::*;

    #[tokio::test]
    async fn test_exclude_then_process() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::new("")), None, settings(Backend::Shuffle));

        let reply = send(&dispatcher, "1", "/exclude привет, дела").await.expect("exclude");
        assert!(reply.contains("привет, дела"));

        let reply = send(&dispatcher, "1", "Привет мир как дела").await.expect("process");
        assert!(
            reply == "Результат:\n\nмир как  " || reply == "Результат:\n\nкак мир  ",
            "unexpected reply {:?}",
            reply
        );
    }

    #[tokio::test]
    async fn test_exclusions_are_per_user_and_clearable() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::new("")), None, settings(Backend::Shuffle));

        send(&dispatcher, "alice", "/exclude тест").await.expect("exclude");

        let reply = send(&dispatcher, "alice", "Тест тест тест").await.expect("process");
        assert_eq!(reply, format!("Результат:\n\n{}", ALL_EXCLUDED_MESSAGE));

        let reply = send(&dispatcher, "bob", "Тест").await.expect("process");
        assert_eq!(reply, "Результат:\n\nТест");

        send(&dispatcher, "alice", "/clear").await.expect("clear");
        let reply = send(&dispatcher, "alice", "/process Тест").await.expect("process");
        assert_eq!(reply, "Результат:\n\nТест");
    }

    #[tokio::test]
    async fn test_runs_are_recorded_in_history() {
        let (_dir, pool) = create_test_pool().await;
        let dispatcher = DispatcherHandle::with_llm(
            Arc::new(MockLlm::new("")),
            Some(pool.clone()),
            settings(Backend::Shuffle),
        );

        send(&dispatcher, "7", "/count 2").await.expect("count");
        send(&dispatcher, "7", "/exclude кот").await.expect("exclude");
        let reply = send(&dispatcher, "7", "кот спит").await.expect("process");
        assert_eq!(
            reply,
            "Результаты (2):\n\n--- 1 ---\nспит \n\n--- 2 ---\nспит "
        );

        let stored = database::get_user_history(&pool, "7", 10)
            .await
            .expect("Failed to read history");
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|e| e.exclude_words.as_deref() == Some("кот")));

        let history = send(&dispatcher, "7", "/history").await.expect("history");
        assert!(history.starts_with("История запросов (за последние 7 дней):"));
        assert!(history.contains("   Запрос: кот спит\n   Исключено: кот\n"));
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let dispatcher = DispatcherHandle::with_llm(
            Arc::new(MockLlm::new("")),
            None,
            DispatcherSettings {
                rate_limit: 2,
                ..settings(Backend::Shuffle)
            },
        );

        send(&dispatcher, "1", "раз").await.expect("first");
        send(&dispatcher, "1", "два").await.expect("second");
        let err = send(&dispatcher, "1", "три").await.expect_err("third should be limited");
        assert!(matches!(err, AppError::RateLimited));

        // commands are not counted, other users are unaffected
        send(&dispatcher, "1", "/help").await.expect("help");
        send(&dispatcher, "2", "раз").await.expect("other user");
    }
}

#[cfg(test)]
mod llm_backend_tests {
    use super::*;

    #[tokio::test]
    async fn test_custom_prompt_and_count() {
        let (_dir, pool) = create_test_pool().await;
        let llm = Arc::new(MockLlm::new("готово"));
        let dispatcher =
            DispatcherHandle::with_llm(llm.clone(), Some(pool.clone()), settings(Backend::Llm));

        send(&dispatcher, "9", "/prompt Убери {exc} из: {text}").await.expect("prompt");
        send(&dispatcher, "9", "/count 3").await.expect("count");
        send(&dispatcher, "9", "/exclude мир").await.expect("exclude");

        let reply = send(&dispatcher, "9", "Привет мир").await.expect("process");
        assert!(reply.starts_with("Результаты (3):"));
        assert_eq!(reply.matches("готово").count(), 3);

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p == "Убери мир из: Привет мир"));

        let stored = database::get_user_history(&pool, "9", 10)
            .await
            .expect("Failed to read history");
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|e| e.result_text == "готово"));
    }

    #[tokio::test]
    async fn test_default_prompt_without_database() {
        let llm = Arc::new(MockLlm::new("ответ"));
        let dispatcher = DispatcherHandle::with_llm(llm.clone(), None, settings(Backend::Llm));

        let reply = send(&dispatcher, "1", "кот").await.expect("process");
        assert_eq!(reply, "Результат:\n\nответ");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Текст: кот."));
    }

    #[tokio::test]
    async fn test_llm_failure_is_reported() {
        let dispatcher =
            DispatcherHandle::with_llm(Arc::new(MockLlm::failing()), None, settings(Backend::Llm));

        let err = send(&dispatcher, "1", "текст").await.expect_err("should fail");
        assert!(matches!(err, AppError::Llm(_)));

        // the dispatcher keeps serving after a failed request
        assert_eq!(send(&dispatcher, "1", "/help").await.expect("help"), HELP_TEXT);
    }
}

use crate::fs_manager::PortablePathManager;
use crate::models::{clamp_request_count, HistoryEntry, UserSettings, MIN_REQUEST_COUNT};
use chrono::{Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// How far back `get_user_history` looks.
pub const HISTORY_RETENTION_DAYS: i64 = 7;

pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {}", db_path.display());
    PortablePathManager::ensure_parent_dir(db_path)?;

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_settings (
            user_id TEXT PRIMARY KEY,
            prompt_template TEXT,
            request_count INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            request_text TEXT NOT NULL,
            exclude_words TEXT,
            result_text TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_user_requests_user_created ON user_requests (user_id, created_at)",
    )
    .execute(&pool)
    .await?;

    info!("Database initialized, schema ready.");

    Ok(pool)
}

// --- Request history ---

pub async fn save_request(
    pool: &SqlitePool,
    user_id: &str,
    request_text: &str,
    exclude_words: Option<&str>,
    result_text: &str,
) -> Result<HistoryEntry, sqlx::Error> {
    let created_at = Utc::now().timestamp();
    let exclude_words = exclude_words.map(str::trim).filter(|w| !w.is_empty());

    sqlx::query_as::<_, HistoryEntry>(
        r#"
        INSERT INTO user_requests (user_id, request_text, exclude_words, result_text, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, request_text, exclude_words, result_text, created_at
        "#,
    )
    .bind(user_id)
    .bind(request_text)
    .bind(exclude_words)
    .bind(result_text)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

/// Most recent requests of the last week, newest first.
pub async fn get_user_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<HistoryEntry>, sqlx::Error> {
    let since = (Utc::now() - Duration::days(HISTORY_RETENTION_DAYS)).timestamp();

    sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, user_id, request_text, exclude_words, result_text, created_at
        FROM user_requests
        WHERE user_id = ? AND created_at >= ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await
}

// --- User settings ---

pub async fn get_user_settings(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<UserSettings, sqlx::Error> {
    let stored = sqlx::query_as::<_, UserSettings>(
        r#"
        SELECT prompt_template, request_count
        FROM user_settings
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(match stored {
        Some(settings) => UserSettings {
            prompt_template: settings.prompt_template.filter(|p| !p.trim().is_empty()),
            request_count: settings.request_count.max(MIN_REQUEST_COUNT),
        },
        None => UserSettings::default(),
    })
}

/// Stores a prompt template. An empty template resets to the default prompt.
pub async fn update_user_prompt(
    pool: &SqlitePool,
    user_id: &str,
    prompt_template: Option<&str>,
) -> Result<(), sqlx::Error> {
    let prompt_template = prompt_template.map(str::trim).filter(|p| !p.is_empty());

    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, prompt_template, request_count)
        VALUES (?, ?, 1)
        ON CONFLICT(user_id) DO UPDATE SET prompt_template = excluded.prompt_template
        "#,
    )
    .bind(user_id)
    .bind(prompt_template)
    .execute(pool)
    .await?;

    Ok(())
}

/// Stores the clamped request count and returns the stored value.
pub async fn update_user_count(
    pool: &SqlitePool,
    user_id: &str,
    raw_count: &str,
) -> Result<i64, sqlx::Error> {
    let count = clamp_request_count(raw_count);

    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, prompt_template, request_count)
        VALUES (?, NULL, ?)
        ON CONFLICT(user_id) DO UPDATE SET request_count = excluded.request_count
        "#,
    )
    .bind(user_id)
    .bind(count)
    .execute(pool)
    .await?;

    Ok(count)
}

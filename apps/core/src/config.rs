//! Runtime configuration read from the environment (and `.env`).

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_RATE_LIMIT: usize = 20;
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;

/// Which transformation handles chat text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// The local shuffle engine.
    #[default]
    Shuffle,
    /// The remote language model, driven by the user's prompt template.
    Llm,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shuffle" => Ok(Backend::Shuffle),
            "llm" => Ok(Backend::Llm),
            other => Err(AppError::Config(format!(
                "unknown backend '{}', expected 'shuffle' or 'llm'",
                other
            ))),
        }
    }
}

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

/// Settings for the language-model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub backend: Backend,
    pub llm: LlmConfig,
    pub rate_limit: usize,
    pub rate_window: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PortablePathManager::default_db_path(),
            backend: Backend::default(),
            llm: LlmConfig::default(),
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: Duration::from_secs(DEFAULT_RATE_WINDOW_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_process_env()
    }

    /// Reads the process environment only.
    pub fn from_process_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let db_path = var("WORDMIX_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let backend = match var("WORDMIX_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.backend,
        };

        let api_url = var("DEEPSEEK_API_URL").unwrap_or(defaults.llm.api_url);
        Url::parse(&api_url)?;

        let llm = LlmConfig {
            api_key: var("DEEPSEEK_API_KEY"),
            api_url: api_url.trim_end_matches('/').to_string(),
            model: var("DEEPSEEK_MODEL").unwrap_or(defaults.llm.model),
        };

        let rate_limit = match var("WORDMIX_RATE_LIMIT") {
            Some(raw) => parse_positive("WORDMIX_RATE_LIMIT", &raw)? as usize,
            None => defaults.rate_limit,
        };

        let rate_window = match var("WORDMIX_RATE_WINDOW_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("WORDMIX_RATE_WINDOW_SECS", &raw)?),
            None => defaults.rate_window,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            db_path,
            backend,
            llm,
            rate_limit,
            rate_window,
            log_format,
        })
    }
}

/// Non-empty value of an environment variable.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, AppError> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Config(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}

//! # Text Engine
//!
//! Shuffles the words of a text while keeping its whitespace layout, after
//! removing every word that matches, or shares a root with, an exclude word.
//!
//! ## Components
//! - `stem`: suffix-stripping root extraction
//! - `relatedness`: root comparison between two words
//! - `exclusion`: exclude-list parsing and token filtering
//! - `layout`: tokenization, shuffle and reassembly
//!
//! Everything here is synchronous and free of shared state.

pub mod exclusion;
pub mod layout;
pub mod relatedness;
pub mod stem;

pub use exclusion::ExcludeSet;
#[allow(unused_imports)]
pub use layout::{reassemble, render, segments, shuffle_tokens, tokenize, Segment};
#[allow(unused_imports)]
pub use relatedness::related;
#[allow(unused_imports)]
pub use stem::stem;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Result text returned when every word was excluded.
pub const ALL_EXCLUDED_MESSAGE: &str = "Все слова были исключены. Результат пуст.";

/// Input the engine refuses to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Текст не может быть пустым")]
    EmptyInput,
    #[error("Текст не содержит слов")]
    NoWords,
}

/// Successful engine outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Shuffled text in the input layout.
    Rendered(String),
    /// Every word was removed by the exclude list.
    AllExcluded,
}

impl ProcessOutcome {
    /// The text shown to the user for this outcome.
    pub fn text(&self) -> &str {
        match self {
            ProcessOutcome::Rendered(text) => text,
            ProcessOutcome::AllExcluded => ALL_EXCLUDED_MESSAGE,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ProcessOutcome::Rendered(text) => text,
            ProcessOutcome::AllExcluded => ALL_EXCLUDED_MESSAGE.to_string(),
        }
    }
}

/// Wire shape of an engine call: `{"result": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Result { result: String },
    Error { error: String },
}

impl From<Result<ProcessOutcome, EngineError>> for ProcessResponse {
    fn from(outcome: Result<ProcessOutcome, EngineError>) -> Self {
        match outcome {
            Ok(outcome) => ProcessResponse::Result {
                result: outcome.into_text(),
            },
            Err(e) => ProcessResponse::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Runs the full pipeline with the thread-local random generator.
pub fn process(text: &str, exclude_raw: &str) -> Result<ProcessOutcome, EngineError> {
    process_with_rng(text, exclude_raw, &mut rand::thread_rng())
}

/// Runs the full pipeline with a caller-supplied random generator.
pub fn process_with_rng<R: Rng + ?Sized>(
    text: &str,
    exclude_raw: &str,
    rng: &mut R,
) -> Result<ProcessOutcome, EngineError> {
    if text.trim().is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(EngineError::NoWords);
    }

    let exclude = ExcludeSet::parse(exclude_raw);
    let surviving = exclude.filter(&tokens);
    debug!(
        tokens = tokens.len(),
        excluded_words = exclude.len(),
        surviving = surviving.len(),
        "Filtered tokens"
    );

    if surviving.is_empty() {
        return Ok(ProcessOutcome::AllExcluded);
    }

    Ok(ProcessOutcome::Rendered(render(text, &surviving, rng)))
}

//! Tracing subscriber setup.
//!
//! Human-readable compact output by default; bunyan JSON when `LOG_FORMAT=json`.
//! `RUST_LOG` overrides the level picked from the command line.

use crate::config::LogFormat;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Registry};

const SERVICE_NAME: &str = "wordmix";

/// Maps the `-v` count to a default level.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber. Logs go to stderr.
pub fn init_tracing(level: LevelFilter, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let result = match format {
        LogFormat::Pretty => {
            let subscriber = fmt()
                .compact()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(
                    SERVICE_NAME.to_string(),
                    std::io::stderr,
                ));
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if result.is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

//! Tracing setup shared by the Uppe binaries.
//!
//! `RUST_LOG` overrides the level handed in by the caller and
//! `RUST_LOG_FORMAT=json` switches to one JSON object per line.

use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{
    Layer, Registry, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

pub fn init() {
    init_with_level("info");
}

/// Install the subscriber with `level` as default directive. Unknown levels
/// fall back to INFO.
pub fn init_with_level(level: &str) {
    if let Err(error) = try_init_with_level(level) {
        warn!("Tracing subscriber already installed: {error}");
    }
}

/// Like [`init`] but tolerates an already installed subscriber, as happens
/// when several tests initialise logging.
pub fn try_init() -> Result<(), TryInitError> {
    try_init_with_level("info")
}

fn try_init_with_level(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry().with(build_layer(parse_level(level))).try_init()
}

pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::INFO)
}

fn build_layer(level: LevelFilter) -> Box<dyn Layer<Registry> + Send + Sync> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        _ => tracing_subscriber::fmt::layer().compact().with_filter(env_filter).boxed(),
    }
}

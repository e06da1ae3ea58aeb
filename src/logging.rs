//! Logging setup for the step.
//!
//! Installs a global `tracing` subscriber writing to stdout, where the
//! Actions runner collects it. `RUST_LOG` overrides the default `info` level.

use anyhow::{anyhow, Result};
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Colors are dropped inside Actions, whose log viewer shows raw escapes.
fn use_ansi() -> bool {
    env::var("GITHUB_ACTIONS").map_or(true, |value| value != "true")
}

/// Initialize tracing. Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter())
        .with_ansi(use_ansi())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}

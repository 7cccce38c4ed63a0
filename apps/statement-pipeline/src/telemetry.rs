//! Tracing setup.
//!
//! Console subscriber with `RUST_LOG`-style filtering. The batch nature of
//! the pipeline keeps this deliberately small: one subscriber, env-driven
//! level, target shown outside development.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `info`)
//! - `PIPELINE_ENV`: `development` enables ANSI colors and hides targets

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests can
/// initialize freely.
pub fn init_tracing() {
    let is_development = std::env::var("PIPELINE_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(!is_development)
        .with_ansi(is_development)
        .try_init();
}

use std::env;
use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "TABULA_LOG";

/// Installs a stderr subscriber filtered by `TABULA_LOG`, defaulting to `warn`.
pub fn init() -> Result<(), String> {
    let level_value = env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());

    let filter = if level_value.eq_ignore_ascii_case("off") {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    } else {
        EnvFilter::try_new(&level_value).map_err(|err| format!("Invalid {LOG_ENV} filter: {err}"))?
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}"))
}

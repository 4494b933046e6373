//! Console logging setup.

use anyhow::{Context, Result};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Installs a stderr subscriber at `level`; `RUST_LOG` takes precedence.
pub fn init(level: &str) -> Result<()> {
    let default_level = level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level {:?}, using info", level);
        LevelFilter::INFO
    });

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    tracing::debug!("Logging initialized at level: {}", default_level);
    Ok(())
}

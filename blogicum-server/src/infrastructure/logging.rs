use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Tracing setup. `RUST_LOG` wins over the configured default; an unparsable
/// default degrades to `info` instead of failing startup.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("tracing subscriber init: {e}"))?;

    Ok(())
}

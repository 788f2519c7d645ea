//! Observability (logging)
//!
//! Structured logging through `tracing`. Output goes to stderr so stdout
//! stays reserved for the summary (and `--json` output).

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Initialize the logging stack
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` applies
/// (e.g. `"warn"`, `"sbom_fixtures=debug"`).
///
/// # Example
///
/// ```rust,no_run
/// use sbom_fixtures::config::LogFormat;
/// use sbom_fixtures::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init("info", LogFormat::Pretty)?;
/// tracing::info!("Generating fixtures");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_directive: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Pretty => registry.with(fmt.pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt.compact()).try_init(),
        LogFormat::Json => registry.with(fmt.json()).try_init(),
    }
    .context("Failed to install tracing subscriber")
}

/// Filter directive for a verbosity level (`-q` = -1, default 0, `-v` = 1, `-vv` = 2)
#[must_use]
pub const fn directive_for_verbosity(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

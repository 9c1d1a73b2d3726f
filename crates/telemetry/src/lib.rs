//! Logging bootstrap for the bootstrap binary.

use aidd_kernel::settings::{LogFormat, TelemetrySettings};
use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter. Output goes to stderr so that
/// command output on stdout stays machine readable.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(from_env.as_deref(), &settings.filter)?;
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(
        target: "aidd-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

/// An invalid `RUST_LOG` value is ignored in favor of the configured filter.
fn build_filter(from_env: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    if let Some(filter) = from_env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .map_err(|err| anyhow!("invalid log filter '{configured}': {err}"))
}

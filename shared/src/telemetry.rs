//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error returned when the global subscriber cannot be installed
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a global fmt subscriber for the given logging configuration
///
/// `RUST_LOG` wins over `config.level` when set. Installing twice is not an
/// error: the first subscriber stays active and later calls return `Ok(())`,
/// which keeps this usable from tests that each try to initialise logging.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Full => builder.try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }

    Ok(())
}

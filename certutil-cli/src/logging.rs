//! Tracing subscriber setup; everything goes to stderr so stdout stays a clean report

use crate::error::{CliError, Result};
use crate::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::{fmt::time::ChronoUtc, EnvFilter};

/// Overrides the configured level, e.g. `CERTUTIL_LOG=credential_store=debug`
pub const LOG_ENV: &str = "CERTUTIL_LOG";

/// Build the filter: `CERTUTIL_LOG` when set and valid, the configured level otherwise.
///
/// # Errors
///
/// Returns [`CliError::Logging`] when the configured level is not a valid directive.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level)
        .map_err(|e| CliError::Logging(format!("invalid level '{}': {}", settings.level, e)))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`CliError::Logging`] for an invalid level or when a subscriber
/// is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoUtc::rfc_3339());

    let installed = match settings.format {
        LogFormat::Compact => builder.compact().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
    };
    installed.map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        let settings = LoggingSettings {
            level: "retention_engine=loud".to_string(),
            format: LogFormat::Compact,
        };
        if std::env::var(LOG_ENV).is_err() {
            assert!(matches!(env_filter(&settings), Err(CliError::Logging(_))));
        }
    }

    #[test]
    fn test_level_directive_is_accepted() {
        let settings = LoggingSettings {
            level: "warn,retention_engine=debug".to_string(),
            format: LogFormat::Json,
        };
        assert!(env_filter(&settings).is_ok());
    }
}

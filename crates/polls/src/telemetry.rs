use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "APP_LOG_LEVEL '{value}' is not a valid tracing filter")
            }
            TelemetryError::Subscriber(err) => write!(f, "subscriber already installed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs the global compact `tracing` subscriber.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

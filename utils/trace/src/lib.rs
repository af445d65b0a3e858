use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; `default_filter` applies when it is unset.
pub fn tracing_init(default_filter: &str) -> Result<(), TracingInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|source| TracingInitError::FilterParse { source })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .map_err(|source| TracingInitError::SubscriberInstall { source })?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("FilterParse: {source}")]
    FilterParse {
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("SubscriberInstall: {source}")]
    SubscriberInstall {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

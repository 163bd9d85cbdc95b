use thiserror::Error;

/// Errors raised while configuring or installing a logger.
///
/// Logging calls themselves never fail; these only surface at the edges
/// where a caller can meaningfully react.
#[derive(Debug, Error)]
pub enum Error {
    /// A level name was not recognised.
    #[error("unknown log level: {0:?}")]
    ParseLevel(String),

    /// A timestamp granularity name was not recognised.
    #[error("unknown timestamp granularity: {0:?}")]
    ParseGranularity(String),

    /// The process-wide logger was already set.
    #[error("global logger already initialized")]
    AlreadyInitialized,

    /// Another backend is already registered with the `log` facade.
    #[error("failed to register log backend: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;

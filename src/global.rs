//! Process-wide logger.
//!
//! Set once with [`init`]; read with [`logger`]. Until `init` runs,
//! `logger` hands out a default built from the [`Builder`] defaults plus
//! [`Builder::env_overrides`]. Libraries should prefer taking a `Logger`
//! from their caller and leave this to the binary.

use std::sync::OnceLock;

use lazy_static::lazy_static;

use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::options::Builder;

lazy_static! {
    /// Used until a logger is installed. Built on first access.
    static ref DEFAULT_LOGGER: Logger = Builder::default().env_overrides().build();

    /// Set by [`init`], at most once.
    static ref INSTALLED: OnceLock<Logger> = OnceLock::new();
}

/// Installs `logger` as the process-wide logger.
///
/// Only the first call succeeds; later calls return
/// [`Error::AlreadyInitialized`] and leave the installed logger in place.
pub fn init(logger: Logger) -> Result<()> {
    INSTALLED
        .set(logger)
        .map_err(|_| Error::AlreadyInitialized)
}

/// The installed logger, or the default one if [`init`] has not run.
pub fn logger() -> &'static Logger {
    match INSTALLED.get() {
        Some(logger) => logger,
        None => &*DEFAULT_LOGGER,
    }
}

pub fn is_initialized() -> bool {
    INSTALLED.get().is_some()
}

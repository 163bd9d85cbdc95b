use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Severity of a log record.
///
/// Levels are totally ordered; a logger drops every record whose level is
/// below its configured minimum before doing any formatting work.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    #[default]
    Debug = 0,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// The tag written into every line, e.g. `INFO`.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Closest `log::LevelFilter` that lets this level and everything above through.
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            // log has no level above Error, so Fatal records come in as Error
            Level::Error | Level::Fatal => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let level = if s.eq_ignore_ascii_case("debug") || s.eq_ignore_ascii_case("trace") {
            Level::Debug
        } else if s.eq_ignore_ascii_case("info") {
            Level::Info
        } else if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") {
            Level::Warn
        } else if s.eq_ignore_ascii_case("error") {
            Level::Error
        } else if s.eq_ignore_ascii_case("fatal") || s.eq_ignore_ascii_case("panic") {
            Level::Fatal
        } else {
            return Err(Error::ParseLevel(s.to_owned()));
        };
        Ok(level)
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

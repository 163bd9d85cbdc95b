use std::env;
use std::io;
use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};

use crate::clock::{Clock, Granularity, SystemClock};
use crate::level::Level;
use crate::logger::{Fallback, Logger};
use crate::pool::{BufferPool, DEFAULT_BUFFER_CAPACITY};
use crate::sink::{LockedWriter, Sink, Stderr};

/// Environment variable read by [`Builder::env_overrides`] for the minimum level.
pub const ENV_LEVEL: &str = "LGR_LEVEL";
/// Environment variable read by [`Builder::env_overrides`] for the granularity.
pub const ENV_TIME: &str = "LGR_TIME";

/// Draft configuration for a [`Logger`].
///
/// Defaults: no name, standard error, millisecond timestamps in UTC, every
/// level enabled, failed writes counted and dropped.
///
/// Each setter touches exactly one field, so setters for different fields
/// can be called in any order with the same result; calling the same
/// setter twice keeps the last value.
///
/// ```
/// use lgr::{Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .name("db")
///     .sink(sink.clone())
///     .time_with_seconds()
///     .build();
///
/// lgr::infof!(logger, "opened %d connections", 4);
/// assert!(sink.to_string_lossy().ends_with(" INFO db opened 4 connections\n"));
/// ```
pub struct Builder {
    name: Option<String>,
    min_level: Level,
    sink: Arc<dyn Sink>,
    clock: Arc<dyn Clock>,
    granularity: Granularity,
    offset: FixedOffset,
    fallback: Fallback,
    buffer_capacity: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            name: None,
            min_level: Level::Debug,
            sink: Arc::new(Stderr),
            clock: Arc::new(SystemClock),
            granularity: Granularity::Millis,
            offset: utc(),
            fallback: Fallback::Drop,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component tag written after the level.
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Sends output to `writer`, serialising concurrent records through a lock.
    pub fn writer<W: io::Write + Send + 'static>(self, writer: W) -> Self {
        self.sink(LockedWriter::new(writer))
    }

    /// Sends output to a sink that handles concurrency itself.
    pub fn sink<S: Sink + 'static>(self, sink: S) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    /// Sends output to an already shared sink.
    pub fn shared_sink(self, sink: Arc<dyn Sink>) -> Self {
        Self { sink, ..self }
    }

    /// Records below `level` are dropped before any formatting.
    pub fn min_level(self, min_level: Level) -> Self {
        Self { min_level, ..self }
    }

    pub fn granularity(self, granularity: Granularity) -> Self {
        Self {
            granularity,
            ..self
        }
    }

    /// Whole-second timestamps.
    pub fn time_with_seconds(self) -> Self {
        self.granularity(Granularity::Seconds)
    }

    /// Microsecond timestamps.
    pub fn time_with_micros(self) -> Self {
        self.granularity(Granularity::Micros)
    }

    pub fn clock<C: Clock + 'static>(self, clock: C) -> Self {
        Self {
            clock: Arc::new(clock),
            ..self
        }
    }

    /// Renders timestamps at a fixed offset from UTC.
    pub fn utc_offset(self, offset: FixedOffset) -> Self {
        Self { offset, ..self }
    }

    /// Renders timestamps in the local zone.
    ///
    /// The offset is read once, here, and stays fixed for the life of the
    /// logger; a DST change is not picked up by an existing logger.
    pub fn local_time(self) -> Self {
        self.utc_offset(*chrono::Local::now().offset())
    }

    /// Copies records the sink failed to take to standard error.
    pub fn stderr_fallback(self) -> Self {
        Self {
            fallback: Fallback::Stderr,
            ..self
        }
    }

    /// Initial capacity of pooled render buffers.
    pub fn buffer_capacity(self, buffer_capacity: usize) -> Self {
        Self {
            buffer_capacity,
            ..self
        }
    }

    /// Applies `LGR_LEVEL` and `LGR_TIME` when they are set and parse.
    ///
    /// Unparseable values are ignored so a typo in the environment cannot
    /// stop a program from starting.
    pub fn env_overrides(self) -> Self {
        let mut builder = self;
        if let Some(level) = env::var(ENV_LEVEL).ok().and_then(|v| v.parse().ok()) {
            builder = builder.min_level(level);
        }
        if let Some(granularity) = env::var(ENV_TIME).ok().and_then(|v| v.parse().ok()) {
            builder = builder.granularity(granularity);
        }
        builder
    }

    /// Applies `option` to this draft.
    pub fn apply(self, option: LoggerOption) -> Self {
        (option.0)(self)
    }

    /// Freezes the configuration.
    pub fn build(self) -> Logger {
        Logger::from_parts(
            self.name.map(Arc::from),
            self.min_level,
            self.sink,
            self.clock,
            self.granularity,
            self.offset,
            self.fallback,
            Arc::new(BufferPool::new(self.buffer_capacity)),
        )
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// One configuration step for [`Logger::with_options`].
///
/// Options are applied left to right on top of the [`Builder`] defaults.
///
/// ```
/// use lgr::{options, Logger};
///
/// let logger = Logger::with_options([
///     options::name("test"),
///     options::writer(std::io::sink()),
///     options::time_with_seconds(),
/// ]);
/// assert_eq!(logger.name(), Some("test"));
/// ```
pub struct LoggerOption(Box<dyn FnOnce(Builder) -> Builder>);

impl LoggerOption {
    pub fn new(apply: impl FnOnce(Builder) -> Builder + 'static) -> Self {
        Self(Box::new(apply))
    }
}

pub fn name(name: impl Into<String>) -> LoggerOption {
    let name = name.into();
    LoggerOption::new(move |b| b.name(name))
}

pub fn writer<W: io::Write + Send + 'static>(writer: W) -> LoggerOption {
    LoggerOption::new(move |b| b.writer(writer))
}

pub fn sink<S: Sink + 'static>(sink: S) -> LoggerOption {
    LoggerOption::new(move |b| b.sink(sink))
}

pub fn time_with_seconds() -> LoggerOption {
    LoggerOption::new(Builder::time_with_seconds)
}

pub fn time_with_micros() -> LoggerOption {
    LoggerOption::new(Builder::time_with_micros)
}

pub fn min_level(level: Level) -> LoggerOption {
    LoggerOption::new(move |b| b.min_level(level))
}

pub fn clock<C: Clock + 'static>(clock: C) -> LoggerOption {
    LoggerOption::new(move |b| b.clock(clock))
}

pub fn utc_offset(offset: FixedOffset) -> LoggerOption {
    LoggerOption::new(move |b| b.utc_offset(offset))
}

pub fn local_time() -> LoggerOption {
    LoggerOption::new(Builder::local_time)
}

pub fn stderr_fallback() -> LoggerOption {
    LoggerOption::new(Builder::stderr_fallback)
}

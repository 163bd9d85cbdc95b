use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::FixedOffset;

use crate::clock::{self, Clock, Granularity};
use crate::error::Result;
use crate::format::{self, Arg, ByteWriter};
use crate::level::Level;
use crate::options::{Builder, LoggerOption};
use crate::pool::BufferPool;
use crate::sink::Sink;

/// What happens to a record the sink failed to take.
///
/// Either way the failure is counted in [`Logger::write_errors`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Drop the record.
    #[default]
    Drop,
    /// Copy the record to standard error.
    Stderr,
}

/// A leveled, printf-style text logger.
///
/// Every call renders one line,
///
/// ```text
/// <timestamp> <LEVEL> [<name> ]<message>
/// ```
///
/// into a buffer borrowed from the logger's pool and hands it to the sink
/// in a single write. Records below the minimum level return before any
/// work is done. Once the pool is warm a call does not touch the heap.
///
/// Configuration is fixed at construction. Clones share the sink, the
/// buffer pool and the error counter, so a logger can be handed to any
/// number of threads.
///
/// # Examples
///
/// ```
/// use lgr::{options, FixedClock, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::with_options([
///     options::name("test"),
///     options::sink(sink.clone()),
///     options::clock(FixedClock::from_secs(1_136_214_245)),
///     options::time_with_seconds(),
/// ]);
///
/// lgr::infof!(logger, "format %s,\t%d,%f\n", "sample", 9999, 10.10);
/// assert_eq!(
///     sink.to_string_lossy(),
///     "2006-01-02 15:04:05 INFO test format sample,\t9999,10.100000\n"
/// );
/// ```
#[derive(Clone)]
pub struct Logger {
    name: Option<Arc<str>>,
    min_level: Level,
    sink: Arc<dyn Sink>,
    clock: Arc<dyn Clock>,
    granularity: Granularity,
    utc_offset: FixedOffset,
    fallback: Fallback,
    pool: Arc<BufferPool>,
    write_errors: Arc<AtomicU64>,
}

impl Default for Logger {
    fn default() -> Self {
        Builder::default().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("granularity", &self.granularity)
            .field("utc_offset", &self.utc_offset)
            .field("fallback", &self.fallback)
            .field("write_errors", &self.write_errors())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Builds a logger from the defaults with `options` applied in order.
    pub fn with_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        options
            .into_iter()
            .fold(Builder::default(), Builder::apply)
            .build()
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: Option<Arc<str>>,
        min_level: Level,
        sink: Arc<dyn Sink>,
        clock: Arc<dyn Clock>,
        granularity: Granularity,
        utc_offset: FixedOffset,
        fallback: Fallback,
        pool: Arc<BufferPool>,
    ) -> Self {
        Self {
            name,
            min_level,
            sink,
            clock,
            granularity,
            utc_offset,
            fallback,
            pool,
            write_errors: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a record at `level` would be written.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    #[inline]
    pub fn debugf(&self, format: &str, args: &[Arg<'_>]) {
        self.logf(Level::Debug, format, args)
    }

    #[inline]
    pub fn infof(&self, format: &str, args: &[Arg<'_>]) {
        self.logf(Level::Info, format, args)
    }

    #[inline]
    pub fn warnf(&self, format: &str, args: &[Arg<'_>]) {
        self.logf(Level::Warn, format, args)
    }

    #[inline]
    pub fn errorf(&self, format: &str, args: &[Arg<'_>]) {
        self.logf(Level::Error, format, args)
    }

    /// Logs at [`Level::Fatal`]. Does not terminate the process.
    #[inline]
    pub fn fatalf(&self, format: &str, args: &[Arg<'_>]) {
        self.logf(Level::Fatal, format, args)
    }

    /// Logs `format` rendered with `args` at `level`.
    ///
    /// Never fails and never panics on a bad template; see [`format`](crate::format)
    /// for how mistakes are reported.
    #[inline]
    pub fn logf(&self, level: Level, format: &str, args: &[Arg<'_>]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, |out| format::render(out, format, args));
    }

    /// Logs at [`Level::Fatal`], then panics with the rendered message.
    pub fn panicf(&self, format: &str, args: &[Arg<'_>]) -> ! {
        let mut message = Vec::new();
        format::render(&mut message, format, args);
        trim_newlines(&mut message);
        if self.enabled(Level::Fatal) {
            self.emit(Level::Fatal, |out| out.extend_from_slice(&message));
        }
        panic!("{}", String::from_utf8_lossy(&message))
    }

    /// Logs a message rendered through `core::fmt`, with the same line layout.
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, |out| {
            // a failing Display impl leaves whatever it wrote so far
            let _ = ByteWriter(out).write_fmt(args);
        });
    }

    fn emit(&self, level: Level, render: impl FnOnce(&mut Vec<u8>)) {
        let mut buf = self.pool.checkout();
        let out: &mut Vec<u8> = &mut buf;

        clock::write_timestamp_with_offset_secs(
            out,
            self.clock.now(),
            self.granularity,
            self.utc_offset.local_minus_utc(),
        );
        out.push(b' ');
        out.extend_from_slice(level.as_str().as_bytes());
        out.push(b' ');
        if let Some(name) = &self.name {
            out.extend_from_slice(name.as_bytes());
            out.push(b' ');
        }
        render(&mut *out);
        trim_newlines(out);
        out.push(b'\n');

        self.write_record(out);
    }

    fn write_record(&self, record: &[u8]) {
        match self.sink.write(record) {
            Ok(n) if n == record.len() => {}
            _ => {
                self.write_errors.fetch_add(1, Ordering::Relaxed);
                if self.fallback == Fallback::Stderr {
                    let _ = io::stderr().lock().write_all(record);
                }
            }
        }
    }

    /// Number of records the sink failed to accept in full.
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    pub fn flush(&self) {
        let _ = self.sink.flush();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Registers a clone of this logger as the `log` crate backend.
    ///
    /// Fails if some other backend was registered first.
    pub fn install(&self) -> Result<()> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.min_level.to_level_filter());
        Ok(())
    }
}

fn trim_newlines(buf: &mut Vec<u8>) {
    while buf.last() == Some(&b'\n') {
        buf.pop();
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        self.log_fmt(record.level().into(), *record.args());
    }

    fn flush(&self) {
        Logger::flush(self)
    }
}

/// Logs at an explicit level, converting each argument with [`ToArg`](crate::ToArg).
///
/// ```
/// # let logger = lgr::Logger::builder().sink(lgr::Discard).build();
/// lgr::logf!(logger, lgr::Level::Warn, "retry %d of %d", 2, 5);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.logf($level, $fmt, &[$($crate::ToArg::to_arg(&$arg)),*])
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($rest:tt)+) => {
        $crate::logf!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $($rest:tt)+) => {
        $crate::logf!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($rest:tt)+) => {
        $crate::logf!($logger, $crate::Level::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($rest:tt)+) => {
        $crate::logf!($logger, $crate::Level::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($rest:tt)+) => {
        $crate::logf!($logger, $crate::Level::Fatal, $($rest)+)
    };
}

//! # lgr
//!
//! A small leveled text logger with printf-style messages, built so the
//! logging call itself stays cheap:
//!
//! * **No per-call allocation**: records render into pooled buffers, and
//!   numbers, timestamps and `Display` values are formatted in place
//! * **Free when filtered**: a record below the minimum level returns
//!   before any formatting or I/O
//! * **Whole lines only**: each record reaches its sink in one write, so
//!   lines from concurrent threads never interleave
//!
//! ## Line format
//!
//! ```text
//! 2006-01-02 15:04:05.000 INFO name message
//! ```
//!
//! Timestamp precision is seconds, milliseconds (default) or microseconds;
//! the name is omitted when unset.
//!
//! ## Main Components
//!
//! * [`Logger`]: the logging facade, cheap to clone and share between threads
//! * [`options`]: construction through functional options or a [`Builder`]
//! * [`format`]: the `%`-verb renderer behind `infof` and friends
//! * [`Sink`]: where finished lines go; [`LockedWriter`] adapts any `io::Write`
//! * [`global`]: an optional init-once process-wide logger
//!
//! ## Quick Start
//!
//! ```
//! use lgr::{infof, options, warnf, Logger};
//!
//! let logger = Logger::with_options([
//!     options::name("api"),
//!     options::writer(std::io::stdout()),
//!     options::time_with_seconds(),
//! ]);
//!
//! infof!(logger, "listening on %s:%d", "0.0.0.0", 8080);
//! warnf!(logger, "slow request took %.2fs", 1.25);
//! ```
//!
//! The [`log`] crate macros can be routed here too with [`Logger::install`].

pub mod clock;
pub mod error;
pub mod format;
pub mod global;
pub mod level;
pub mod logger;
pub mod options;
pub mod pool;
pub mod sink;

pub use clock::{Clock, FixedClock, Granularity, SystemClock};
pub use error::{Error, Result};
pub use format::{Arg, ToArg};
pub use level::Level;
pub use logger::{Fallback, Logger};
pub use options::{Builder, LoggerOption};
pub use pool::{BufferPool, PooledBuffer};
pub use sink::{Discard, LockedWriter, MemorySink, Sink, Stderr, Stdout};

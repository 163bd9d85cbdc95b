use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::error::Error;

/// Time source used to stamp records.
///
/// Returns the current instant as a duration since the Unix epoch. The
/// logger converts it to wall-clock text itself, so a clock only has to be
/// cheap and thread-safe.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall clock backed by [`SystemTime`]. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        // a clock set before 1970 renders as the epoch rather than failing the call
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to.
///
/// Useful wherever output has to be byte-for-byte predictable. Instants
/// past `u64::MAX` nanoseconds (about year 2554) are pinned there.
#[derive(Debug, Default)]
pub struct FixedClock {
    nanos: AtomicU64,
}

impl FixedClock {
    pub fn new(since_epoch: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(saturating_nanos(since_epoch)),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn set(&self, since_epoch: Duration) {
        self.nanos.store(saturating_nanos(since_epoch), Ordering::Release);
    }

    pub fn advance(&self, by: Duration) {
        let by = saturating_nanos(by);
        // the closure never returns None, so this cannot fail
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(by)));
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

/// Precision of the rendered timestamp.
///
/// | Granularity | Example                      |
/// |-------------|------------------------------|
/// | `Seconds`   | `2006-01-02 15:04:05`        |
/// | `Millis`    | `2006-01-02 15:04:05.000`    |
/// | `Micros`    | `2006-01-02 15:04:05.000000` |
///
/// Fractions are truncated, never rounded, so a stamp never points into
/// the following second.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Seconds,
    #[default]
    Millis,
    Micros,
}

impl Granularity {
    /// Length in bytes of a timestamp rendered at this granularity.
    pub const fn width(self) -> usize {
        match self {
            Granularity::Seconds => SECOND_LEN,
            Granularity::Millis => SECOND_LEN + 4,
            Granularity::Micros => SECOND_LEN + 7,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Granularity::Seconds => "seconds",
            Granularity::Millis => "millis",
            Granularity::Micros => "micros",
        })
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(Granularity::Seconds),
            "ms" | "milli" | "millis" | "milliseconds" => Ok(Granularity::Millis),
            "us" | "micro" | "micros" | "microseconds" => Ok(Granularity::Micros),
            other => Err(Error::ParseGranularity(other.to_owned())),
        }
    }
}

/// `YYYY-MM-DD hh:mm:ss`
const SECOND_LEN: usize = 19;

#[derive(Clone, Copy)]
struct CachedSecond {
    local_secs: i64,
    text: [u8; SECOND_LEN],
}

thread_local! {
    // Last rendered whole second on this thread. Records arrive many per
    // second, so the calendar math usually runs once per second per thread.
    static LAST_SECOND: Cell<CachedSecond> = const {
        Cell::new(CachedSecond {
            local_secs: i64::MIN,
            text: [0; SECOND_LEN],
        })
    };
}

/// Appends the timestamp for `since_epoch`, shifted by `offset`, to `out`.
///
/// Deterministic for a given instant, granularity and offset. Does not
/// allocate beyond growing `out`.
pub fn write_timestamp(
    out: &mut Vec<u8>,
    since_epoch: Duration,
    granularity: Granularity,
    offset: FixedOffset,
) {
    write_timestamp_with_offset_secs(out, since_epoch, granularity, offset.local_minus_utc());
}

#[inline]
pub(crate) fn write_timestamp_with_offset_secs(
    out: &mut Vec<u8>,
    since_epoch: Duration,
    granularity: Granularity,
    offset_secs: i32,
) {
    let local_secs = i64::try_from(since_epoch.as_secs())
        .unwrap_or(i64::MAX)
        .saturating_add(i64::from(offset_secs));

    let second = LAST_SECOND
        .try_with(|cache| {
            let cached = cache.get();
            if cached.local_secs == local_secs {
                cached.text
            } else {
                let text = render_second(local_secs);
                cache.set(CachedSecond { local_secs, text });
                text
            }
        })
        // thread-local already torn down; render without the cache
        .unwrap_or_else(|_| render_second(local_secs));
    out.extend_from_slice(&second);

    let nanos = since_epoch.subsec_nanos();
    match granularity {
        Granularity::Seconds => {}
        Granularity::Millis => {
            let mut frac = [b'.', 0, 0, 0];
            put_digits(&mut frac[1..], nanos / 1_000_000);
            out.extend_from_slice(&frac);
        }
        Granularity::Micros => {
            let mut frac = [b'.', 0, 0, 0, 0, 0, 0];
            put_digits(&mut frac[1..], nanos / 1_000);
            out.extend_from_slice(&frac);
        }
    }
}

fn render_second(local_secs: i64) -> [u8; SECOND_LEN] {
    // beyond chrono's range renders as the epoch
    let at = DateTime::from_timestamp(local_secs, 0).unwrap_or_default();

    let mut text = *b"0000-00-00 00:00:00";
    put_digits(&mut text[0..4], at.year().clamp(0, 9999) as u32);
    put_digits(&mut text[5..7], at.month());
    put_digits(&mut text[8..10], at.day());
    put_digits(&mut text[11..13], at.hour());
    put_digits(&mut text[14..16], at.minute());
    put_digits(&mut text[17..19], at.second());
    text
}

/// Writes `value` as zero-padded decimal filling all of `dst`.
#[inline]
fn put_digits(dst: &mut [u8], mut value: u32) {
    for slot in dst.iter_mut().rev() {
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for finished log lines.
///
/// A sink receives one complete record per call and reports how many bytes
/// it accepted. Implementations are shared by every thread that logs through
/// the same [`Logger`](crate::Logger), so they must be safe to call
/// concurrently. Writers that are not, such as a plain `File`, go through
/// [`LockedWriter`], which is what the `writer` option does for you.
///
/// The logger never retries a failed or short write.
pub trait Sink: Send + Sync {
    /// Writes one record, returning the number of bytes accepted.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Flushes any buffering inside the sink.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    #[inline]
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    #[inline]
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Serialises access to an [`io::Write`] so whole records reach it one at a time.
///
/// The lock is held for a single `write_all`, so a record is never split
/// or interleaved with another thread's record.
pub struct LockedWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> LockedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> Sink for LockedWriter<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// Standard error. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stderr;

impl Sink for Stderr {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// Standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Sink for Stdout {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Accepts and drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Sink for Discard {
    #[inline]
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }
}

/// In-memory capture of everything written, shareable between the logger
/// and whoever wants to inspect the output.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    data: Arc<Mutex<Vec<u8>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all bytes written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    /// Captured output as text; invalid UTF-8 is replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data.lock()).into_owned()
    }

    /// Captured output split into lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.to_string_lossy().lines().map(str::to_owned).collect()
    }

    /// Number of `write` calls received.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.data.lock().clear();
        self.writes.store(0, Ordering::Release);
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.data.lock().extend_from_slice(buf);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let other = sink.clone();
        sink.write(b"one\n").unwrap();
        other.write(b"two\n").unwrap();

        assert_eq!(sink.write_count(), 2);
        assert_eq!(other.lines(), vec!["one", "two"]);

        sink.clear();
        assert!(other.contents().is_empty());
        assert_eq!(other.write_count(), 0);
    }

    #[test]
    fn test_locked_writer_writes_whole_record() {
        let sink = LockedWriter::new(Vec::new());
        assert_eq!(sink.write(b"hello\n").unwrap(), 6);
        assert_eq!(sink.write(b"world\n").unwrap(), 6);
        assert_eq!(sink.into_inner(), b"hello\nworld\n");
    }

    #[test]
    fn test_locked_writer_surfaces_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = LockedWriter::new(Broken);
        let err = sink.write(b"lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_discard_reports_full_length() {
        assert_eq!(Discard.write(b"abc").unwrap(), 3);
        let shared: Arc<dyn Sink> = Arc::new(Discard);
        assert_eq!(shared.write(b"abcd").unwrap(), 4);
    }
}

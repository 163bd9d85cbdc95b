//! Steady-state logging must not allocate. Runs under a counting global
//! allocator; counts are per thread so the harness's own threads do not
//! disturb the measurement.

use lgr::{infof, options, warnf, Arg, Level, Logger};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::fmt;

struct CountingAlloc;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn bump() {
    let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump();
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        bump();
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump();
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn allocations_during(f: impl FnOnce()) -> usize {
    let before = ALLOCATIONS.with(Cell::get);
    f();
    ALLOCATIONS.with(Cell::get) - before
}

struct Endpoint {
    host: &'static str,
    port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The six interleaved calls of the reference benchmark.
fn benchmark_calls(logger: &Logger) {
    let msg = "benchmark sample message blow";
    infof!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
    warnf!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
    infof!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
    warnf!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
    infof!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
    warnf!(logger, "format %s,\t%d,%f\n", msg, 9999, 10.10);
}

#[test]
fn test_steady_state_logging_does_not_allocate() {
    let logger = Logger::with_options([
        options::name("test"),
        options::writer(std::io::sink()),
        options::time_with_seconds(),
    ]);

    // fill the pool and the per-thread timestamp cache
    benchmark_calls(&logger);

    let allocations = allocations_during(|| {
        for _ in 0..1_000 {
            benchmark_calls(&logger);
        }
    });
    assert_eq!(allocations, 0, "Logging allocated {} times", allocations);
}

#[test]
fn test_rich_arguments_do_not_allocate() {
    let logger = Logger::with_options([
        options::writer(std::io::sink()),
        options::time_with_micros(),
    ]);
    let endpoint = Endpoint {
        host: "db.internal",
        port: 5432,
    };
    let log = || {
        infof!(
            logger,
            "%-12s|%08.3f|%#x|%q|%v|%T",
            Arg::display(&endpoint),
            -2.5,
            255u32,
            "quoted\tvalue",
            Arg::display(&endpoint),
            true
        );
        logger.log_fmt(Level::Error, format_args!("bridge {} {}", endpoint, 7));
    };
    log();

    let allocations = allocations_during(|| {
        for _ in 0..200 {
            log();
        }
    });
    assert_eq!(allocations, 0, "Logging allocated {} times", allocations);
}

#[test]
fn test_filtered_calls_do_not_allocate() {
    let logger = Logger::with_options([
        options::writer(std::io::sink()),
        options::min_level(Level::Error),
    ]);

    let allocations = allocations_during(|| {
        for i in 0..1_000 {
            infof!(logger, "dropped %d", i);
        }
    });
    assert_eq!(allocations, 0);
}

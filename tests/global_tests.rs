use lgr::{global, infof, options, Error, FixedClock, Logger, MemorySink};
use std::thread;

// One test per process state: the global logger can only be set once, so
// the whole lifecycle is exercised in order inside a single test.
#[test]
fn test_global_logger_lifecycle() {
    assert!(!global::is_initialized());
    let fallback = global::logger();
    assert_eq!(fallback.name(), None);

    let sink = MemorySink::new();
    let installed = Logger::with_options([
        options::name("global"),
        options::sink(sink.clone()),
        options::clock(FixedClock::from_secs(1_136_214_245)),
        options::time_with_seconds(),
    ]);
    global::init(installed).unwrap();
    assert!(global::is_initialized());

    infof!(global::logger(), "hello %s", "world");
    assert_eq!(sink.lines(), vec!["2006-01-02 15:04:05 INFO global hello world"]);

    let second = Logger::with_options([options::name("late")]);
    match global::init(second) {
        Err(Error::AlreadyInitialized) => {}
        other => panic!("Expected AlreadyInitialized, got {:?}", other),
    }
    assert_eq!(global::logger().name(), Some("global"));

    // every thread sees the same installed instance
    let here = global::logger() as *const Logger as usize;
    let seen: Vec<usize> = (0..4)
        .map(|_| thread::spawn(|| global::logger() as *const Logger as usize))
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(seen.iter().all(|&addr| addr == here));
}

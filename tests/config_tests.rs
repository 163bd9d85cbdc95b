use lgr::options::{ENV_LEVEL, ENV_TIME};
use lgr::{Error, Granularity, Level, Logger};
use std::env;

// Environment variables are process-wide, so every case runs in this one test.
#[test]
fn test_env_overrides() {
    env::remove_var(ENV_LEVEL);
    env::remove_var(ENV_TIME);
    let untouched = Logger::builder().min_level(Level::Warn).env_overrides().build();
    assert_eq!(untouched.min_level(), Level::Warn);
    assert_eq!(untouched.granularity(), Granularity::Millis);

    env::set_var(ENV_LEVEL, "error");
    env::set_var(ENV_TIME, "micros");
    let overridden = Logger::builder().env_overrides().build();
    assert_eq!(overridden.min_level(), Level::Error);
    assert_eq!(overridden.granularity(), Granularity::Micros);

    // explicit settings after the overrides still win
    let explicit = Logger::builder()
        .env_overrides()
        .min_level(Level::Debug)
        .build();
    assert_eq!(explicit.min_level(), Level::Debug);

    env::set_var(ENV_LEVEL, "loud");
    env::set_var(ENV_TIME, "fortnight");
    let ignored = Logger::builder().time_with_seconds().env_overrides().build();
    assert_eq!(ignored.min_level(), Level::Debug);
    assert_eq!(ignored.granularity(), Granularity::Seconds);

    env::remove_var(ENV_LEVEL);
    env::remove_var(ENV_TIME);
}

#[test]
fn test_level_parsing() {
    assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("panic".parse::<Level>().unwrap(), Level::Fatal);
    assert_eq!(" info ".parse::<Level>().unwrap(), Level::Info);

    let err = "verbose".parse::<Level>().unwrap_err();
    assert!(matches!(err, Error::ParseLevel(ref s) if s == "verbose"));
    assert_eq!(err.to_string(), "unknown log level: \"verbose\"");
}

use lgr::{debugf, errorf, global, infof, options, warnf, Arg, Level, Logger};
use std::net::SocketAddr;

fn main() -> lgr::Result<()> {
    // LGR_LEVEL / LGR_TIME can adjust these without a rebuild
    let logger = Logger::builder()
        .name("demo")
        .writer(std::io::stdout())
        .time_with_micros()
        .local_time()
        .env_overrides()
        .build();

    let addr: SocketAddr = ([127, 0, 0, 1], 8080).into();
    infof!(logger, "listening on %v", Arg::display(&addr));
    debugf!(logger, "config: %v", Arg::debug(&logger));
    warnf!(logger, "cache %5.1f%% full", 87.25);
    errorf!(logger, "%d of %d workers failed: %q", 2, 8, "timeout");
    infof!(logger, "bad template keeps going: %d %s", "oops");

    // route `log` macros from dependencies through the same logger
    logger.install()?;
    log::info!("via the log facade");

    global::init(Logger::with_options([
        options::name("global"),
        options::writer(std::io::stdout()),
        options::min_level(Level::Info),
    ]))?;
    infof!(global::logger(), "hello from anywhere");

    logger.flush();
    Ok(())
}

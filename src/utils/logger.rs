pub fn setup_logger(config: &super::config::Config) {
    // RUST_LOG, when set, refines the configured level.
    let _ = env_logger::Builder::new()
        .filter_level(level_filter(&config.log_level))
        .parse_default_env()
        .try_init();
}

fn level_filter(level: &str) -> log::LevelFilter {
    match level {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Off,
    }
}

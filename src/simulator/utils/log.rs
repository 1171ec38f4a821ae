//! Logging setup
use env_logger::Env;
use log::LevelFilter;

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_log() {
  let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .format_timestamp(None)
    .try_init();
}

/// Logger for unit and integration tests, output captured by the harness
pub fn init_test_log() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// Cap the log level at warnings
pub fn set_quiet(quiet: bool) {
  if quiet {
    log::set_max_level(LevelFilter::Warn);
  }
}

use std::io;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "BATCHNAME_LOG";

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr, filtered by `BATCHNAME_LOG` or else the `-v` count
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

//! Runtime setup: logging and the rayon pool.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `USEDEF_LOG=debug`
pub const LOG_ENV: &str = "USEDEF_LOG";

/// Rayon thread stack size (8MB for deeply nested programs)
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `USEDEF_LOG` takes precedence over the `-v` count.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {}", e);
    }
}

use crate::infrastructure::config::Config;
use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr so stdout carries only the response body.
///
/// `RUST_LOG` overrides the level picked from `--verbose`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

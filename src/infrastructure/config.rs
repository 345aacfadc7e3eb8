use std::path::PathBuf;
use std::time::Duration;

/// Run-wide settings, built once from the command line and passed down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Debug logging and status line output
    pub verbose: bool,
    /// Upper bound for one request/response exchange
    pub timeout: Option<Duration>,
    /// Print the built request instead of sending it
    pub offline: bool,
    /// Write the response body here instead of stdout
    pub output: Option<PathBuf>,
}

impl Config {
    /// Default log filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

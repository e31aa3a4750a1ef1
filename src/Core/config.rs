use std::time::Duration;

/// Worker count requested when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// How long an idle worker sleeps before re-checking the pool status.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Dispatcher/pool tunables.
///
/// - `DMXP_WORKERS`: requested worker count (default: 4, clamped to [2, 64])
/// - `DMXP_WAIT_TIMEOUT_MS`: idle worker wait bound in milliseconds (default: 1000)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub workers: usize,
    pub wait_timeout: Duration,
}

impl DispatcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let workers = std::env::var("DMXP_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_WORKERS);

        let wait_timeout = std::env::var("DMXP_WAIT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_WAIT_TIMEOUT);

        Self {
            workers,
            wait_timeout,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

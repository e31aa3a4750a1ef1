//! Console logging setup for binaries and demos embedding the dispatcher.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the host. This helper installs a plain fmt subscriber filtered by
//! `RUST_LOG` (default `info`).

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the console subscriber once per process.
///
/// An already-installed global subscriber (e.g. from the host application) is
/// left in place.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_level(true)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already installed, keeping it");
        }
    });
}

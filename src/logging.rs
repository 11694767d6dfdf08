//! Logging setup for embedding applications

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize stderr logging with an env-filter defaulting to
/// `signup_engine=info`.
///
/// The engine itself only emits `tracing` events; call this once from the
/// embedding application if nothing else installs a subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signup_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

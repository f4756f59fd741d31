//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem
//! - Configure the log level from the environment
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` overrides the default filter
//! - Initialization is idempotent so tests can call it freely

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchyard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}

//! Logging utilities for the Werkstatt backend.
//!
//! Every binary calls [`init`] once at start-up. `RUST_LOG` still wins over the
//! default level, e.g. `RUST_LOG=werkstatt_appointments=debug`.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use werkstatt_common::logging;
///
/// logging::init();
/// logging::init_with_level(tracing::Level::DEBUG); // no-op, already initialized
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level for the workspace crates.
pub fn init_with_level(level: Level) {
    // Target directives match by prefix, so this covers every werkstatt_* crate.
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("werkstatt={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    // try_init: tests and the reminder binary may race to install a subscriber
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

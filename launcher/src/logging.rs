//! Developer tracing for the launcher.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Non-root ranks default to silence.
//!
//! - **Output channel (`io/channel`)**: User-visible run status, root only,
//!   console or file. Unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::role::ProcessRole;

/// Filter used when `RUST_LOG` is unset.
///
/// Non-root ranks are silent so N processes do not repeat the same warning.
pub fn default_directive(role: &ProcessRole) -> &'static str {
    if role.is_root() { "warn" } else { "off" }
}

/// Initialize the tracing subscriber for this process.
///
/// Reads `RUST_LOG` (applies to every rank) and falls back to
/// [`default_directive`]. Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=launcher=debug mpirun -n 4 launcher --input in --output out
/// ```
pub fn init(role: &ProcessRole) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(role)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
    tracing::debug!(rank = role.rank(), root = role.root(), "tracing initialized");
}

//! Tracing initialization for the gup compiler driver.
//!
//! Controlled by environment variables:
//! - `GUP_LOG`: filter string (`RUST_LOG` syntax). Falls back to `RUST_LOG`.
//!
//! This is developer-facing instrumentation only (pipeline lifecycle:
//! file open/close, per-token/per-node trace events) — never the
//! user-facing diagnostics a `gup` program author sees on a compile error,
//! which go through [`gup_diagnostic::DiagnosticSink`] instead. When
//! neither `GUP_LOG` nor `RUST_LOG` is set, nothing above `warn` is shown.

use std::sync::OnceLock;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber. Safe to call multiple times — only
/// the first call takes effect.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env("GUP_LOG")
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        Registry::default()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .with(filter)
            .init();
    });
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured logging setup for the host application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured JSON logging.
///
/// Call once from the host process before any controller is created. Respects
/// `RUST_LOG`, defaulting to debug for this crate and info elsewhere. Calling it
/// a second time is a no-op.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let _ = tracing_subscriber::registry()
        .with(default_filter())
        .with(format)
        .try_init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("health_tracker=debug,info"))
}

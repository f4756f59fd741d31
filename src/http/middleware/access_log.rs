//! Access log middleware.

use std::time::Instant;

use crate::http::handler::{handler, Handler};

/// Middleware that drives the rest of the chain and then logs the
/// request line, resolved status, and elapsed time.
pub fn access_log() -> Handler {
    handler(|ctx| async move {
        let started = Instant::now();
        let method = ctx.method().clone();
        let path = ctx.path().to_string();
        let ctx = ctx.next().await;
        let status = ctx
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(200);
        tracing::info!(
            method = %method,
            path = %path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request served"
        );
        ctx
    })
}

//! Request ID middleware.
//!
//! Tags each request with a UUID v4 as early as possible so log lines
//! across the chain can be correlated.

use uuid::Uuid;

use crate::http::handler::{handler, Handler};

/// Header carrying the generated request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Middleware that stamps an `x-request-id` response header and drives
/// the rest of the chain.
pub fn request_id() -> Handler {
    handler(|mut ctx| async move {
        let id = Uuid::new_v4().to_string();
        ctx.set_header(X_REQUEST_ID, &id);
        ctx.next().await
    })
}

//! HTTP dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request (from the listener primitive)
//!     -> server.rs (match, policy, body buffering, panic boundary)
//!     -> context.rs (per-request state, chain cursor)
//!     -> handler.rs (middleware + terminal handlers)
//!     -> render.rs (content type + body)
//!     -> Response back to the listener
//! ```

pub mod context;
pub mod deadline;
pub mod handler;
pub mod middleware;
pub mod render;
pub mod server;

pub use context::Context;
pub use deadline::Deadline;
pub use handler::{handler, Handler};
pub use server::Engine;

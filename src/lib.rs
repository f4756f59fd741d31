//! Switchyard: an embeddable HTTP request-dispatch layer.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                DISPATCH ENGINE               │
//!                    │                                              │
//!   Request          │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ────────────────>│  │ listener│──>│  router  │──>│  handler  │  │
//!                    │  │ (Axum)  │   │  (scan)  │   │  chain    │  │
//!                    │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                    │                                     │        │
//!   Response         │  ┌─────────┐   ┌──────────┐         │        │
//!   <────────────────│  │ render  │<──│ context  │<────────┘        │
//!                    │  └─────────┘   └──────────┘                  │
//!                    │                                              │
//!                    │  Cross-cutting: config (hot swap), deadline  │
//!                    │  signals, panic isolation, tracing           │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The engine resolves each incoming request to a registered handler
//! chain, manages the request lifecycle (timeout, abort, panic
//! recovery), and composes routes hierarchically through groups with
//! inherited middleware. It never touches sockets itself; the listener
//! primitive hands it a request and takes back a response.
//!
//! # Example
//!
//! ```
//! use axum::http::StatusCode;
//! use switchyard::{handler, Engine};
//!
//! let mut engine = Engine::new();
//! engine.router_mut().root().get(
//!     "/users/:id",
//!     "user",
//!     [handler(|mut ctx| async move {
//!         let id = ctx.get("id").unwrap_or_default();
//!         ctx.string(StatusCode::OK, format!("user {id}"));
//!         ctx
//!     })],
//! );
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod observability;

pub use config::{ConfigError, EngineConfig, RouteOverrides};
pub use error::{RegistrationError, RenderError};
pub use http::middleware;
pub use http::{handler, Context, Deadline, Engine, Handler};
pub use routing::{Pattern, Route, RouteGroup, Router};

//! Dispatch engine and server wiring.
//!
//! # Responsibilities
//! - Build a fresh context per request and resolve its deadline policy
//! - Buffer the request body within the resolved size limit
//! - Run the matched chain (or the not-found handler) inside a
//!   panic-isolation boundary
//! - Mount the engine on the listener primitive (Axum) with tracing and a
//!   connection-level timeout
//!
//! # Design Decisions
//! - The engine never touches sockets itself; the hosting layer hands it
//!   a request and takes back a response
//! - A panic anywhere in a chain is converted to a 500 and logged with
//!   the request line and a stack trace; the serving task survives
//! - The deadline guard is scoped to the dispatch call, so the signal is
//!   released on every exit path

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode, Uri};
use axum::routing::any;
use futures_util::FutureExt;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::EngineConfig;
use crate::http::context::Context;
use crate::http::deadline::Deadline;
use crate::http::render::CONTENT_TEXT;
use crate::routing::router::Router;

/// The dispatch engine: route table plus engine-wide configuration.
///
/// Registration happens before serving and is not synchronized against
/// dispatch; once [`Engine::serve`] starts, the route table is read-only.
#[derive(Debug)]
pub struct Engine {
    router: Router,
    config: ArcSwap<EngineConfig>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            router: Router::new(),
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Build an engine from a TOML config file.
    pub fn from_config_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        Ok(Self::with_config(load_config(path)?))
    }

    /// Replace the engine configuration. Last write wins; in-flight
    /// requests keep the values they already resolved.
    pub fn set_config(&self, config: EngineConfig) {
        self.config.store(Arc::new(config));
    }

    pub fn config(&self) -> Arc<EngineConfig> {
        self.config.load_full()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Serve one request: match, apply policy, run the chain, recover.
    pub async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        let (head, raw_body) = request.into_parts();
        let method = head.method.clone();
        let uri = head.uri.clone();

        // 1. Match the route table.
        let Some(route) = self.router.match_route(&method, uri.path()) else {
            return self.run_not_found(head, &method, &uri).await;
        };

        // 2. Resolve the per-request policy: a route override replaces
        //    the engine defaults wholesale.
        let defaults = self.config.load();
        let (timeout, max_body) = match route.overrides() {
            Some(overrides) => (overrides.timeout(), overrides.max_request_body),
            None => (defaults.timeout(), defaults.max_request_body),
        };

        // 3. Buffer the body within the resolved limit.
        let body = match buffer_body(&head, raw_body, max_body).await {
            Ok(bytes) => bytes,
            Err(response) => return response,
        };

        // 4. Derive the deadline signal. The guard releases it whichever
        //    way this function exits.
        let (deadline, guard) = Deadline::new(timeout);
        let mut ctx = Context::new(head, deadline);
        ctx.set_body(body);

        // 5. Run the chain inside the panic-isolation boundary.
        let response = match AssertUnwindSafe(route.handle(ctx)).catch_unwind().await {
            Ok(ctx) => ctx.into_response(),
            Err(panic) => {
                report_panic(&method, &uri, &*panic);
                internal_error_response()
            }
        };
        guard.release();
        response
    }

    async fn run_not_found(&self, head: Parts, method: &Method, uri: &Uri) -> Response<Body> {
        let (deadline, guard) = Deadline::new(Duration::ZERO);
        let ctx = Context::new(head, deadline);
        let not_found = self.router.not_found().clone();
        let response = match AssertUnwindSafe(not_found.call(ctx)).catch_unwind().await {
            Ok(ctx) => ctx.into_response(),
            Err(panic) => {
                report_panic(method, uri, &*panic);
                internal_error_response()
            }
        };
        guard.release();
        response
    }

    /// Run the engine on `listener` until ctrl-c.
    ///
    /// The engine is mounted as a catch-all handler; the configured read
    /// and write budgets bound the connection-level request lifetime,
    /// which is what ultimately enforces an expired deadline.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let config = self.config.load_full();
        let engine = Arc::new(self);

        let mut app = axum::Router::new()
            .route("/{*path}", any(serve_request))
            .route("/", any(serve_request))
            .with_state(engine);
        let connection_budget = config.read_timeout() + config.write_timeout();
        if !connection_budget.is_zero() {
            app = app.layer(TimeoutLayer::new(connection_budget));
        }
        let app = app.layer(TraceLayer::new_for_http());

        tracing::info!(
            address = %listener.local_addr()?,
            "dispatch engine serving"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

async fn serve_request(
    State(engine): State<Arc<Engine>>,
    request: Request<Body>,
) -> Response<Body> {
    engine.dispatch(request).await
}

/// Buffer the request body, rejecting it past `limit` bytes.
///
/// A declared Content-Length over the limit is rejected before reading;
/// chunked bodies are cut off by the buffering limit itself.
async fn buffer_body(head: &Parts, body: Body, limit: usize) -> Result<Bytes, Response<Body>> {
    if let Some(declared) = head
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
    {
        if declared > limit {
            return Err(payload_too_large(limit));
        }
    }
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| payload_too_large(limit))
}

fn payload_too_large(limit: usize) -> Response<Body> {
    let mut response = Response::new(Body::from(format!(
        "request body exceeds limit of {limit} bytes"
    )));
    *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TEXT));
    response
}

fn internal_error_response() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

fn report_panic(method: &Method, uri: &Uri, panic: &dyn std::any::Any) {
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!(
        method = %method,
        uri = %uri,
        panic = %panic_message(panic),
        backtrace = %backtrace,
        "handler panicked, request answered with 500"
    );
}

fn panic_message(panic: &dyn std::any::Any) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

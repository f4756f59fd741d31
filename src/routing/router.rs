//! Route table and request matching.
//!
//! # Responsibilities
//! - Hold the root group's route table, frozen once serving starts
//! - Resolve a method + path to a route, or hand off to the not-found
//!   handler
//!
//! # Design Decisions
//! - Linear scan in registration order; route counts are small and the
//!   table is immutable during serving, so no locking and no index
//! - Among routes whose pattern fully matches the path, the first one
//!   whose method also matches wins; with no method match the LAST
//!   path-only match is returned as a fallback. The method mismatch then
//!   surfaces inside the chain rather than as a dedicated 405. This is a
//!   quirk of the scan order kept for compatibility; see DESIGN.md

use axum::http::{Method, StatusCode};
use std::sync::Arc;

use crate::http::handler::{handler, Handler};
use crate::routing::group::RouteGroup;
use crate::routing::route::Route;

/// The dispatcher's routing half: a root group plus the not-found
/// fallback.
#[derive(Debug)]
pub struct Router {
    root: RouteGroup,
    not_found: Handler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            root: RouteGroup::root(),
            not_found: default_not_found(),
        }
    }

    /// Replace the not-found fallback handler.
    pub fn set_not_found(&mut self, handler: Handler) -> &mut Self {
        self.not_found = handler;
        self
    }

    pub(crate) fn not_found(&self) -> &Handler {
        &self.not_found
    }

    /// The root route group, for registration.
    pub fn root(&mut self) -> &mut RouteGroup {
        &mut self.root
    }

    /// Look up a route by its full dotted name.
    pub fn route(&self, name: &str) -> Option<&Arc<Route>> {
        self.root.route(name)
    }

    /// Resolve `method` + `path` against the route table.
    pub(crate) fn match_route(&self, method: &Method, path: &str) -> Option<Arc<Route>> {
        let mut fallback = None;
        for route in self.root.routes() {
            if !route.pattern().matches(path) {
                continue;
            }
            if route.method() == method {
                return Some(route.clone());
            }
            fallback = Some(route.clone());
        }
        fallback
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Default 404 handler naming the unmatched method and path.
fn default_not_found() -> Handler {
    handler(|mut ctx| async move {
        let body = format!("no route found for {}:{}", ctx.method(), ctx.uri());
        ctx.string(StatusCode::NOT_FOUND, body);
        ctx
    })
}

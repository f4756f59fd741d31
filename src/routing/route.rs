//! A registered route: method, compiled pattern, handler chain, overrides.
//!
//! # Design Decisions
//! - Routes are immutable after registration except for the optional
//!   per-route overrides, which sit behind an atomic pointer swap so a
//!   concurrent update is last-write-wins and never observed torn
//! - Parameter extraction re-runs the compiled matcher against the path;
//!   on a duplicate parameter name the last position wins, matching the
//!   pattern compiler's documented quirk

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::http::Method;

use crate::config::schema::RouteOverrides;
use crate::http::context::Context;
use crate::http::handler::Handler;
use crate::routing::pattern::Pattern;

/// One entry in the dispatcher's route table.
#[derive(Debug)]
pub struct Route {
    name: String,
    method: Method,
    pattern: Pattern,
    chain: Arc<[Handler]>,
    overrides: ArcSwapOption<RouteOverrides>,
}

impl Route {
    pub(crate) fn new(name: String, method: Method, pattern: Pattern, chain: Vec<Handler>) -> Self {
        Self {
            name,
            method,
            pattern,
            chain: chain.into(),
            overrides: ArcSwapOption::empty(),
        }
    }

    /// Globally unique route name, dotted with its group lineage.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub(crate) fn chain(&self) -> &[Handler] {
        &self.chain
    }

    /// Replace the per-route configuration. Safe to call while the engine
    /// is serving; in-flight requests keep whichever value they resolved.
    pub fn set_overrides(&self, overrides: RouteOverrides) {
        self.overrides.store(Some(Arc::new(overrides)));
    }

    /// Remove the per-route configuration, falling back to the engine
    /// defaults.
    pub fn clear_overrides(&self) {
        self.overrides.store(None);
    }

    /// Current per-route configuration, if any.
    pub fn overrides(&self) -> Option<Arc<RouteOverrides>> {
        self.overrides.load_full()
    }

    /// Populate the context with this route's parameters and chain, then
    /// drive the chain.
    pub(crate) async fn handle(&self, mut ctx: Context) -> Context {
        let mut params = HashMap::new();
        if let Some(values) = self.pattern.captures(ctx.path()) {
            for (name, value) in self.pattern.param_names().iter().zip(values) {
                params.insert(name.clone(), value);
            }
        }
        ctx.set_params(params);
        ctx.set_chain(self.chain.clone());
        ctx.next().await
    }
}

//! Route groups: prefix composition and middleware inheritance.
//!
//! # Responsibilities
//! - Join group prefixes (duplicate slashes collapsed, a trailing slash on
//!   the added segment preserved)
//! - Snapshot inherited middleware into child groups and new routes
//! - Enforce globally unique route names, eagerly
//!
//! # Design Decisions
//! - Registration is a startup operation: it happens before the engine
//!   serves and is not synchronized against dispatch
//! - Middleware lists are copied, not shared: `use_middleware` only
//!   affects routes and child groups created after the call
//! - The route table preserves registration order; the dispatcher's
//!   linear scan depends on it

use std::sync::Arc;

use axum::http::Method;

use crate::error::RegistrationError;
use crate::http::handler::Handler;
use crate::routing::pattern::Pattern;
use crate::routing::route::Route;

/// A namespace node producing routes and child groups.
#[derive(Debug)]
pub struct RouteGroup {
    name: String,
    path: String,
    middleware: Vec<Handler>,
    routes: Vec<Arc<Route>>,
}

impl RouteGroup {
    pub(crate) fn root() -> Self {
        Self {
            name: String::new(),
            path: "/".to_string(),
            middleware: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// The group's absolute path prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append middleware to this group. Effective only for routes and
    /// child groups registered after this call.
    pub fn use_middleware(&mut self, middleware: impl IntoIterator<Item = Handler>) {
        self.middleware.extend(middleware);
    }

    /// Create a child group under `path`, run `build` against it, then
    /// merge its routes back into this group.
    ///
    /// The child copies this group's prefix and current middleware; later
    /// changes to the parent do not propagate into it. Panics on a
    /// duplicate route name, which is a configuration error meant to stop
    /// startup.
    pub fn group<F>(
        &mut self,
        path: &str,
        name: &str,
        build: F,
        middleware: impl IntoIterator<Item = Handler>,
    ) where
        F: FnOnce(&mut RouteGroup),
    {
        if let Err(err) = self.try_group(path, name, build, middleware) {
            panic!("group registration failed: {err}");
        }
    }

    /// Fallible form of [`RouteGroup::group`].
    pub fn try_group<F>(
        &mut self,
        path: &str,
        name: &str,
        build: F,
        middleware: impl IntoIterator<Item = Handler>,
    ) -> Result<(), RegistrationError>
    where
        F: FnOnce(&mut RouteGroup),
    {
        let mut merged = self.middleware.clone();
        merged.extend(middleware);
        let mut child = RouteGroup {
            name: self.full_name(name),
            path: self.abs_path(path),
            middleware: merged,
            routes: Vec::new(),
        };
        build(&mut child);
        // Merge is eager: a name collision surfaces here, not at request
        // time.
        for route in &child.routes {
            if self.route(route.name()).is_some() {
                return Err(RegistrationError::DuplicateRouteName(
                    route.name().to_string(),
                ));
            }
        }
        self.routes.append(&mut child.routes);
        Ok(())
    }

    pub fn get(&mut self, path: &str, name: &str, handlers: impl IntoIterator<Item = Handler>) -> Arc<Route> {
        self.add_route(path, Method::GET, name, handlers)
    }

    pub fn post(&mut self, path: &str, name: &str, handlers: impl IntoIterator<Item = Handler>) -> Arc<Route> {
        self.add_route(path, Method::POST, name, handlers)
    }

    pub fn put(&mut self, path: &str, name: &str, handlers: impl IntoIterator<Item = Handler>) -> Arc<Route> {
        self.add_route(path, Method::PUT, name, handlers)
    }

    pub fn delete(&mut self, path: &str, name: &str, handlers: impl IntoIterator<Item = Handler>) -> Arc<Route> {
        self.add_route(path, Method::DELETE, name, handlers)
    }

    pub fn head(&mut self, path: &str, name: &str, handlers: impl IntoIterator<Item = Handler>) -> Arc<Route> {
        self.add_route(path, Method::HEAD, name, handlers)
    }

    /// Register a route. The effective chain is the group's current
    /// middleware followed by `handlers`, the last of which is the
    /// terminal handler. Panics on an invalid pattern or duplicate name.
    pub fn add_route(
        &mut self,
        path: &str,
        method: Method,
        name: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> Arc<Route> {
        match self.try_add_route(path, method, name, handlers) {
            Ok(route) => route,
            Err(err) => panic!("route registration failed: {err}"),
        }
    }

    /// Fallible form of [`RouteGroup::add_route`].
    pub fn try_add_route(
        &mut self,
        path: &str,
        method: Method,
        name: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> Result<Arc<Route>, RegistrationError> {
        if !path.starts_with('/') {
            return Err(RegistrationError::PatternNotRooted(path.to_string()));
        }
        let name = self.full_name(name);
        if self.route(&name).is_some() {
            return Err(RegistrationError::DuplicateRouteName(name));
        }
        let pattern = Pattern::compile(&self.abs_path(path))?;
        let mut chain = self.middleware.clone();
        chain.extend(handlers);
        let route = Arc::new(Route::new(name, method, pattern, chain));
        self.routes.push(route.clone());
        Ok(route)
    }

    /// Look up a route by its full dotted name.
    pub fn route(&self, name: &str) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.name() == name)
    }

    /// Routes in registration order.
    pub(crate) fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Join this group's prefix with `path`.
    ///
    /// Duplicate slashes collapse; a trailing slash on the added segment
    /// is preserved.
    fn abs_path(&self, path: &str) -> String {
        if path.is_empty() {
            return self.path.clone();
        }
        let mut joined = String::new();
        for segment in self.path.split('/').chain(path.split('/')) {
            if !segment.is_empty() {
                joined.push('/');
                joined.push_str(segment);
            }
        }
        if joined.is_empty() {
            joined.push('/');
        } else if path.ends_with('/') {
            joined.push('/');
        }
        joined
    }

    fn full_name(&self, name: &str) -> String {
        if self.name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::context::Context;
    use crate::http::handler::handler;

    fn noop() -> Handler {
        handler(|ctx: Context| async move { ctx })
    }

    #[test]
    fn test_prefix_join_collapses_duplicate_slashes() {
        let mut root = RouteGroup::root();
        root.group(
            "/api/",
            "api",
            |api| {
                let route = api.get("//users/:id", "user", [noop()]);
                assert_eq!(route.pattern().raw(), "/api/users/:id");
            },
            [],
        );
    }

    #[test]
    fn test_trailing_slash_on_added_segment_preserved() {
        let mut root = RouteGroup::root();
        let route = root.get("/files/", "files", [noop()]);
        assert_eq!(route.pattern().raw(), "/files/");
    }

    #[test]
    fn test_nested_group_names_are_dotted() {
        let mut root = RouteGroup::root();
        root.group(
            "/api",
            "api",
            |api| {
                api.group(
                    "/v1",
                    "v1",
                    |v1| {
                        v1.get("/users", "users", [noop()]);
                    },
                    [],
                );
            },
            [],
        );
        assert!(root.route("api.v1.users").is_some());
        assert!(root.route("users").is_none());
    }

    #[test]
    fn test_middleware_applies_only_to_later_routes() {
        let mut root = RouteGroup::root();
        root.get("/before", "before", [noop()]);
        root.use_middleware([noop(), noop()]);
        root.get("/after", "after", [noop()]);

        // Chain lengths expose the middleware snapshot each route took at
        // registration.
        assert_eq!(root.route("before").unwrap().chain().len(), 1);
        assert_eq!(root.route("after").unwrap().chain().len(), 3);
    }

    #[test]
    fn test_child_group_snapshot_is_isolated_from_parent() {
        let mut root = RouteGroup::root();
        let mut late_inherited = None;
        root.group(
            "/home",
            "home",
            |home| {
                home.get("/test", "test", [noop()]);
            },
            [noop()],
        );
        root.use_middleware([noop()]);
        root.group(
            "/late",
            "late",
            |late| {
                late_inherited = Some(late.middleware.len());
                late.get("/x", "x", [noop()]);
            },
            [],
        );

        // The home route froze its chain before the parent grew: one
        // group middleware plus its handler.
        assert_eq!(root.route("home.test").unwrap().chain().len(), 2);
        // The late group copied the parent's updated middleware.
        assert_eq!(late_inherited, Some(1));
        assert_eq!(root.route("late.x").unwrap().chain().len(), 2);
    }

    #[test]
    fn test_duplicate_name_fails_at_registration() {
        let mut root = RouteGroup::root();
        root.get("/a", "dup", [noop()]);
        let err = root
            .try_add_route("/b", Method::GET, "dup", [noop()])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateRouteName(_)));
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_name_panics_on_infallible_surface() {
        let mut root = RouteGroup::root();
        root.get("/a", "dup", [noop()]);
        root.get("/b", "dup", [noop()]);
    }

    #[test]
    fn test_duplicate_name_across_group_merge_fails_eagerly() {
        let mut root = RouteGroup::root();
        root.get("/users", "api.users", [noop()]);
        let result = root.try_group(
            "/api",
            "api",
            |api| {
                api.get("/users", "users", [noop()]);
            },
            [],
        );
        assert!(matches!(
            result,
            Err(RegistrationError::DuplicateRouteName(_))
        ));
    }

    #[test]
    fn test_unrooted_path_fails() {
        let mut root = RouteGroup::root();
        let err = root
            .try_add_route("users", Method::GET, "users", [noop()])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::PatternNotRooted(_)));
    }
}

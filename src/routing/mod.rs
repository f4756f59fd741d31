//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     RouteGroup tree (prefixes, inherited middleware)
//!         -> pattern.rs (compile templates, record param names)
//!         -> route.rs (method + pattern + chain + overrides)
//!         -> Frozen into the Router's route table
//!
//! Request time:
//!     method + path
//!         -> router.rs (linear scan, method tie-break)
//!         -> Return: matched Route or the not-found handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - Scan order is registration order; the fallback rule depends on it

pub mod group;
pub mod pattern;
pub mod route;
pub mod router;

pub use group::RouteGroup;
pub use pattern::Pattern;
pub use route::Route;
pub use router::Router;

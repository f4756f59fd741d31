//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file -> loader.rs (parse) -> validation.rs (semantic checks)
//!     -> EngineConfig, swapped into the engine atomically
//!
//! Per-route: RouteOverrides, attached to a Route after registration and
//! hot-swappable while serving
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{EngineConfig, RouteOverrides};
pub use validation::{validate_config, ValidationError};

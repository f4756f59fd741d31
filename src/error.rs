//! Error types shared across the dispatch layer.
//!
//! # Design Decisions
//! - Registration errors are fatal configuration errors: the panicking
//!   registration surface converts them into a startup abort, the `try_*`
//!   surface returns them to the caller
//! - Render errors never abort a running chain; they are recorded on the
//!   request context and surfaced to whoever inspects it

use thiserror::Error;

/// Error raised while registering a route or group.
///
/// All variants are configuration mistakes and are meant to stop startup,
/// never to be handled at request time.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Route patterns are absolute; anything else is a typo.
    #[error("pattern must start with '/', got '{0}'")]
    PatternNotRooted(String),

    /// An explicit `:name(expr)` capture failed to compile.
    #[error("invalid capture expression in pattern '{pattern}': {source}")]
    InvalidCapture {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Route names are unique across the whole group tree.
    #[error("route name '{0}' already exists")]
    DuplicateRouteName(String),
}

/// Error produced by the response render collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

//! Response render collaborator.
//!
//! # Responsibilities
//! - Produce a content-type string and a body for a response payload
//! - Report serialization failures as errors, never as panics
//!
//! # Design Decisions
//! - Render failures are recorded on the request context by the caller and
//!   do not abort the chain or disturb already-committed response state

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Content type for plain-text responses.
pub const CONTENT_TEXT: &str = "text/plain; charset=utf-8";

/// Content type for JSON responses.
pub const CONTENT_JSON: &str = "application/json; charset=utf-8";

/// A renderable response payload.
pub trait Render {
    fn content_type(&self) -> &'static str;
    fn render(&self) -> Result<Vec<u8>, RenderError>;
}

/// Plain-text payload.
pub struct Text(pub String);

impl Render for Text {
    fn content_type(&self) -> &'static str {
        CONTENT_TEXT
    }

    fn render(&self) -> Result<Vec<u8>, RenderError> {
        Ok(self.0.clone().into_bytes())
    }
}

/// JSON payload wrapping any serializable value.
pub struct Json<'a, T: Serialize>(pub &'a T);

impl<T: Serialize> Render for Json<'_, T> {
    fn content_type(&self) -> &'static str {
        CONTENT_JSON
    }

    fn render(&self) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec(self.0)?)
    }
}

/// Conventional JSON reply envelope: an application code, an optional
/// error string, and the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            err: None,
            data,
        }
    }

    pub fn error(code: i32, err: impl Into<String>, data: T) -> Self {
        Self {
            code,
            err: Some(err.into()),
            data,
        }
    }
}

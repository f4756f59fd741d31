//! Per-request context and chain execution.
//!
//! # Responsibilities
//! - Carry request data (head, body, path parameters, query, form fields)
//! - Drive the handler chain through an index cursor with an abort flag
//! - Collect the response (status, headers, rendered body)
//! - Expose the request's deadline signal to handlers
//!
//! # Data Flow
//! ```text
//! Dispatcher builds Context (cursor = -1, aborted = false)
//!     -> Route::handle fills params + chain
//!     -> Context::next drives handlers until the end or an abort
//!     -> Context::into_response produces the final response
//! ```
//!
//! # Design Decisions
//! - A context is created fresh per request and never reused; everything
//!   in it is owned by the one task serving that request, so there are no
//!   locks here
//! - `abort` stops the next scheduling decision only; it does not unwind
//!   the handler that called it
//! - Response commit is single-shot by convention; a second write simply
//!   replaces the first and is not guarded against

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode, Uri};
use serde::Serialize;

use crate::error::RenderError;
use crate::http::deadline::Deadline;
use crate::http::handler::Handler;
use crate::http::render::{Json, Render, Text};

/// Mutable state for one in-flight request.
#[derive(Debug)]
pub struct Context {
    head: Parts,
    body: Bytes,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    chain: Arc<[Handler]>,
    cursor: isize,
    aborted: bool,
    status: Option<StatusCode>,
    content_type: Option<&'static str>,
    response_body: Option<Bytes>,
    response_headers: HeaderMap,
    render_error: Option<RenderError>,
    deadline: Deadline,
}

impl Context {
    pub(crate) fn new(head: Parts, deadline: Deadline) -> Self {
        let query = head
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            head,
            body: Bytes::new(),
            params: HashMap::new(),
            query,
            form: HashMap::new(),
            chain: Vec::new().into(),
            cursor: -1,
            aborted: false,
            status: None,
            content_type: None,
            response_body: None,
            response_headers: HeaderMap::new(),
            render_error: None,
            deadline,
        }
    }

    /// Attach the request body, parsing form fields when the content type
    /// is urlencoded. Multipart bodies are kept raw.
    pub(crate) fn set_body(&mut self, body: Bytes) {
        let is_form = self
            .head
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if is_form {
            self.form = url::form_urlencoded::parse(&body).into_owned().collect();
        }
        self.body = body;
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub(crate) fn set_chain(&mut self, chain: Arc<[Handler]>) {
        self.chain = chain;
    }

    // Request side.

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw request body. Empty until the dispatcher has buffered it.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Path parameters extracted by the matched route.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Look up `name` as a path parameter, falling back to the query
    /// string.
    pub fn get(&self, name: &str) -> Option<String> {
        self.params
            .get(name)
            .or_else(|| self.query.get(name))
            .cloned()
    }

    /// Look up `name` among the request's form fields.
    pub fn post(&self, name: &str) -> Option<String> {
        self.form.get(name).cloned()
    }

    // Lifecycle.

    /// The request's deadline signal.
    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Resolve when the request's deadline expires or its scope ends.
    pub async fn done(&self) {
        self.deadline.done().await
    }

    /// Advance the cursor and invoke the handler at the new position,
    /// unless the chain was aborted or the cursor has passed the end.
    ///
    /// The chain only advances through `next`, so it is the engine that
    /// drives execution: a middleware that awaits it runs the entire
    /// downstream chain to completion (or abort) before regaining control,
    /// and one that returns without calling it short-circuits every
    /// handler after itself without setting the abort flag.
    pub async fn next(mut self) -> Self {
        self.cursor += 1;
        if self.aborted {
            return self;
        }
        let Some(handler) = self.chain.get(self.cursor as usize) else {
            return self;
        };
        let handler = handler.clone();
        handler.call(self).await
    }

    /// Commit `status` and stop the chain at the next scheduling decision.
    ///
    /// Advisory only: the currently executing handler keeps running.
    pub fn abort(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    // Response side.

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Set a response header. Invalid names or values are dropped with a
    /// warning rather than failing the request.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.response_headers.insert(name, value);
            }
            _ => tracing::warn!(name, value, "invalid response header dropped"),
        }
    }

    /// Respond with plain text.
    pub fn string(&mut self, status: StatusCode, body: impl Into<String>) {
        self.write(status, &Text(body.into()));
    }

    /// Respond with JSON. A serialization failure is recorded on the
    /// context and leaves any previously committed response untouched.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) {
        self.write(status, &Json(value));
    }

    fn write(&mut self, status: StatusCode, payload: &dyn Render) {
        match payload.render() {
            Ok(bytes) => {
                self.status = Some(status);
                self.content_type = Some(payload.content_type());
                self.response_body = Some(bytes.into());
            }
            Err(err) => {
                tracing::warn!(error = %err, "render failed, response state unchanged");
                self.render_error = Some(err);
            }
        }
    }

    /// The last render failure, if any.
    pub fn render_error(&self) -> Option<&RenderError> {
        self.render_error.as_ref()
    }

    pub(crate) fn into_response(self) -> Response<Body> {
        let body = self.response_body.map(Body::from).unwrap_or_else(Body::empty);
        let mut response = Response::new(body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        response.headers_mut().extend(self.response_headers);
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use switchyard::{handler, Engine, Handler};

/// A terminal handler answering `status` with a fixed body.
#[allow(dead_code)]
pub fn text(status: StatusCode, body: &'static str) -> Handler {
    handler(move |mut ctx| async move {
        ctx.string(status, body);
        ctx
    })
}

/// Dispatch a bodyless request and collect the response.
#[allow(dead_code)]
pub async fn send(engine: &Engine, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    collect(engine, request).await
}

/// Dispatch a request carrying a body and collect the response.
#[allow(dead_code)]
pub async fn send_with_body(
    engine: &Engine,
    method: &str,
    uri: &str,
    content_type: &str,
    body: &'static str,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("request");
    collect(engine, request).await
}

#[allow(dead_code)]
async fn collect(engine: &Engine, request: Request<Body>) -> (StatusCode, String) {
    let response = engine.dispatch(request).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

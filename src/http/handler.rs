//! Handler chain building blocks.
//!
//! # Design Decisions
//! - Handlers own the request context for the duration of their call and
//!   hand it back when they finish; the chain cursor lives in the context,
//!   so no scheduler state is shared between requests
//! - Handlers are cheap to clone (an `Arc` around the function), so one
//!   chain is shared by every request matching its route

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::http::context::Context;

type HandlerFn = dyn Fn(Context) -> BoxFuture<'static, Context> + Send + Sync;

/// A single handler in a chain: middleware or terminal.
///
/// A middleware drives the rest of its chain by awaiting
/// [`Context::next`]; a terminal handler simply writes a response. A
/// middleware that returns without calling `next` short-circuits every
/// downstream handler without setting the abort flag.
#[derive(Clone)]
pub struct Handler {
    func: Arc<HandlerFn>,
}

impl Handler {
    pub(crate) fn call(&self, ctx: Context) -> BoxFuture<'static, Context> {
        (self.func)(ctx)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

/// Wrap an async function into a [`Handler`].
///
/// ```
/// use switchyard::{handler, Handler};
/// use axum::http::StatusCode;
///
/// let hello: Handler = handler(|mut ctx| async move {
///     ctx.string(StatusCode::OK, "hello");
///     ctx
/// });
/// ```
pub fn handler<F, Fut>(func: F) -> Handler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    Handler {
        func: Arc::new(move |ctx| Box::pin(func(ctx))),
    }
}

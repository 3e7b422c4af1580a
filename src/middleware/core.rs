//! Middleware as pure function composition: a middleware takes a handler
//! and returns a new handler wrapping it.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use http::{Method, StatusCode};

use crate::context::RouteContext;
use crate::handler::{write_plain_status, Handler, Request, ResponseWriter};

/// A handler decorator. Applying `[m1, m2, m3]` to a handler yields
/// `m1(m2(m3(h)))`, so the first middleware in a chain runs first.
pub type Middleware = Arc<dyn Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync>;

/// Wrap `handler` in `middlewares`, innermost last.
pub fn with_middleware(handler: Arc<dyn Handler>, middlewares: &[Middleware]) -> Arc<dyn Handler> {
    let mut handler = handler;
    for middleware in middlewares.iter().rev() {
        handler = middleware(handler);
    }
    handler
}

/// Build a [`Middleware`] from a closure without spelling out the `Arc` type.
pub fn from_fn<F>(f: F) -> Middleware
where
    F: Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Admit only requests whose method matches, case-insensitively; everything
/// else is answered with a plain 405.
pub fn method_guard(method: Method) -> Middleware {
    Arc::new(move |inner: Arc<dyn Handler>| {
        let method = method.clone();
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                if !req.method.as_str().eq_ignore_ascii_case(method.as_str()) {
                    write_plain_status(w, StatusCode::METHOD_NOT_ALLOWED);
                    return;
                }
                inner.serve(w, req, ctx);
            },
        ) as Arc<dyn Handler>
    })
}

/// Admit GET requests, and serve HEAD requests by running the handler
/// against a scratch writer and discarding the body, so shared GET/HEAD
/// logic stays safe.
pub fn get() -> Middleware {
    Arc::new(|inner: Arc<dyn Handler>| {
        let on_head = head()(Arc::clone(&inner));
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                if req.method == Method::GET {
                    inner.serve(w, req, ctx);
                } else {
                    on_head.serve(w, req, ctx);
                }
            },
        ) as Arc<dyn Handler>
    })
}

/// Admit only HEAD requests. The inner handler runs against a scratch
/// writer; its status and headers are kept, the body is dropped and
/// Content-Length is filled in from the dropped body unless already set.
pub fn head() -> Middleware {
    Arc::new(|inner: Arc<dyn Handler>| {
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                if !req.method.as_str().eq_ignore_ascii_case("HEAD") {
                    write_plain_status(w, StatusCode::METHOD_NOT_ALLOWED);
                    return;
                }
                let mut probe = ResponseWriter::new();
                inner.serve(&mut probe, req, ctx);

                w.set_status(probe.status());
                let has_length = probe.get_header("Content-Length").is_some();
                let body_len = probe.body().len();
                let (_, headers, _) = probe.take_parts();
                for (name, value) in headers {
                    w.header(name, value);
                }
                if !has_length {
                    w.header("Content-Length", body_len.to_string());
                }
            },
        ) as Arc<dyn Handler>
    })
}

pub fn post() -> Middleware {
    method_guard(Method::POST)
}

pub fn put() -> Middleware {
    method_guard(Method::PUT)
}

pub fn patch() -> Middleware {
    method_guard(Method::PATCH)
}

pub fn delete() -> Middleware {
    method_guard(Method::DELETE)
}

/// Catch panics unwinding out of the inner handler and let `on_panic`
/// produce the response instead.
pub fn recover<F>(on_panic: F) -> Middleware
where
    F: Fn(&(dyn Any + Send), &mut ResponseWriter, &mut Request, &mut RouteContext)
        + Send
        + Sync
        + 'static,
{
    let on_panic = Arc::new(on_panic);
    Arc::new(move |inner: Arc<dyn Handler>| {
        let on_panic = Arc::clone(&on_panic);
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                let outcome = catch_unwind(AssertUnwindSafe(|| inner.serve(w, req, ctx)));
                if let Err(payload) = outcome {
                    on_panic(payload.as_ref(), w, req, ctx);
                }
            },
        ) as Arc<dyn Handler>
    })
}

/// Bypass `middleware` whenever `predicate` holds for the request.
pub fn skip<P>(middleware: Middleware, predicate: P) -> Middleware
where
    P: Fn(&Request) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    Arc::new(move |inner: Arc<dyn Handler>| {
        let predicate = Arc::clone(&predicate);
        let wrapped = middleware(Arc::clone(&inner));
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                if predicate(req) {
                    inner.serve(w, req, ctx);
                } else {
                    wrapped.serve(w, req, ctx);
                }
            },
        ) as Arc<dyn Handler>
    })
}

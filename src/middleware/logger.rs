//! Request logging middleware built on `tracing`.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::context::RouteContext;
use crate::handler::{Handler, Request, ResponseWriter};

use super::core::Middleware;

/// Emit one `tracing` event per request with method, path, matched
/// pattern, response status and latency.
///
/// Applied through [`crate::Router::use_global`] it also covers redirects
/// and not-found responses.
pub fn logger() -> Middleware {
    Arc::new(|inner: Arc<dyn Handler>| {
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                let start = Instant::now();
                inner.serve(w, req, ctx);
                info!(
                    method = %req.method,
                    path = %ctx.original_path(),
                    pattern = %ctx.pattern(),
                    status = w.status(),
                    latency_us = start.elapsed().as_micros() as u64,
                    "request served"
                );
            },
        ) as Arc<dyn Handler>
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn logger_passes_the_request_through() {
        let handler: Arc<dyn Handler> = Arc::new(
            |w: &mut ResponseWriter, _: &mut Request, _: &mut RouteContext| {
                w.set_status(201);
                w.write_str("made");
            },
        );
        let logged = logger()(handler);

        let mut w = ResponseWriter::new();
        let mut req = Request::new(Method::POST, "/things");
        let mut ctx = RouteContext::new("/things");
        logged.serve(&mut w, &mut req, &mut ctx);

        assert_eq!(w.status(), 201);
        assert_eq!(w.body(), b"made");
    }
}

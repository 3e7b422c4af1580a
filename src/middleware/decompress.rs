//! Transparent gzip request-body decompression.

use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use http::StatusCode;
use tracing::warn;

use crate::context::RouteContext;
use crate::handler::{Handler, Request, ResponseWriter};

use super::core::Middleware;

/// Replace a gzip-encoded request body with its decompressed bytes before
/// the inner handler runs. Requests without `Content-Encoding: gzip` pass
/// through untouched; an empty body passes through as well. A body that
/// fails to decode is answered with 500.
pub fn decompress() -> Middleware {
    Arc::new(|inner: Arc<dyn Handler>| {
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                let gzipped = req
                    .header("content-encoding")
                    .is_some_and(|v| v.eq_ignore_ascii_case("gzip"));
                if !gzipped || req.body.is_empty() {
                    inner.serve(w, req, ctx);
                    return;
                }

                let compressed = std::mem::take(&mut req.body);
                let mut decoded = Vec::new();
                match GzDecoder::new(compressed.as_slice()).read_to_end(&mut decoded) {
                    Ok(_) => {
                        req.body = decoded;
                        req.headers.remove("content-encoding");
                        inner.serve(w, req, ctx);
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to decompress request body");
                        w.set_status(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
                        w.header("Content-Type", "text/plain; charset=utf-8");
                        w.write_str(&format!("unexpected error: {err}\n"));
                    }
                }
            },
        ) as Arc<dyn Handler>
    })
}

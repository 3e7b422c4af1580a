//! CORS middleware: response headers for cross-origin requests and
//! short-circuited preflight handling.

use std::sync::Arc;
use std::time::Duration;

use crate::context::RouteContext;
use crate::handler::{Handler, Request, ResponseWriter};

use super::core::Middleware;

/// Configuration for [`cors`].
#[derive(Clone)]
pub struct CorsOptions {
    /// Value for `Access-Control-Allow-Origin`. When set to `*` together
    /// with `allow_credentials`, the request's own Origin is echoed back
    /// instead, since browsers reject the wildcard for credentialed
    /// requests.
    pub allow_origin: String,
    /// Computes the allowed origin from the request Origin. Takes
    /// precedence over `allow_origin`.
    pub allow_origin_fn: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
    /// Value for `Access-Control-Max-Age`.
    pub max_age: Option<Duration>,
    pub allow_credentials: bool,
    pub expose_headers: Vec<String>,
    /// Headers allowed on preflight. When empty, the preflight request's
    /// `Access-Control-Request-Headers` is echoed back.
    pub allow_headers: Vec<String>,
    pub allow_methods: Vec<String>,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_origin_fn: None,
            max_age: None,
            allow_credentials: false,
            expose_headers: Vec::new(),
            allow_headers: Vec::new(),
            allow_methods: ["GET", "POST", "HEAD", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Non-restrictive CORS: any origin, echoed preflight headers, no
/// credentials.
pub fn default_cors() -> Middleware {
    cors(CorsOptions::default())
}

/// Build a CORS middleware from `options`. Preflight OPTIONS requests are
/// answered with 204 without reaching the inner handler.
pub fn cors(options: CorsOptions) -> Middleware {
    let allow_methods = options.allow_methods.join(", ");
    let allow_headers = options.allow_headers.join(", ");
    let expose_headers = options.expose_headers.join(", ");

    Arc::new(move |inner: Arc<dyn Handler>| {
        let options = options.clone();
        let allow_methods = allow_methods.clone();
        let allow_headers = allow_headers.clone();
        let expose_headers = expose_headers.clone();

        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                let origin = req.header("origin").unwrap_or("").to_string();

                if let Some(allow_origin_fn) = &options.allow_origin_fn {
                    w.header("Access-Control-Allow-Origin", allow_origin_fn(&origin));
                    w.header("Vary", "Origin");
                } else if options.allow_origin == "*" && options.allow_credentials {
                    w.header("Access-Control-Allow-Origin", origin);
                    w.header("Vary", "Origin");
                } else {
                    w.header("Access-Control-Allow-Origin", options.allow_origin.clone());
                }

                if let Some(max_age) = options.max_age {
                    w.header("Access-Control-Max-Age", max_age.as_secs().to_string());
                }

                if options.allow_credentials {
                    w.header("Access-Control-Allow-Credentials", "true");
                }

                if req.method.as_str().eq_ignore_ascii_case("OPTIONS") {
                    if allow_headers.is_empty() {
                        let requested = req
                            .header("access-control-request-headers")
                            .unwrap_or("")
                            .to_string();
                        w.header("Access-Control-Allow-Headers", requested);
                        w.header("Vary", "Access-Control-Request-Headers");
                    } else {
                        w.header("Access-Control-Allow-Headers", allow_headers.clone());
                    }
                    w.header("Access-Control-Allow-Methods", allow_methods.clone());
                    w.set_status(204);
                    return;
                }

                if !expose_headers.is_empty() {
                    w.header("Access-Control-Expose-Headers", expose_headers.clone());
                }

                inner.serve(w, req, ctx);
            },
        ) as Arc<dyn Handler>
    })
}

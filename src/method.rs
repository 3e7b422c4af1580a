//! Method dispatch as a leaf handler.
//!
//! Dispatch over HTTP methods is a per-route decision, not a trie concern:
//! the same pattern is registered once and this leaf fans out by request
//! method when invoked.

use std::sync::Arc;

use http::StatusCode;

use crate::context::RouteContext;
use crate::handler::{write_plain_status, Handler, Request, ResponseWriter};

/// Record of one handler slot per HTTP verb, plus a fallback for requests
/// whose method has no slot.
///
/// Methods are compared case-insensitively. An unset fallback answers with
/// a plain 405; [`crate::Router::register_methods`] fills it with the
/// router's configured method-not-allowed handler instead.
#[derive(Default)]
pub struct MethodHandler {
    pub get: Option<Arc<dyn Handler>>,
    pub post: Option<Arc<dyn Handler>>,
    pub put: Option<Arc<dyn Handler>>,
    pub patch: Option<Arc<dyn Handler>>,
    pub delete: Option<Arc<dyn Handler>>,
    pub head: Option<Arc<dyn Handler>>,
    pub method_not_allowed: Option<Arc<dyn Handler>>,
}

impl MethodHandler {
    fn select(&self, method: &str) -> Option<&Arc<dyn Handler>> {
        if method.eq_ignore_ascii_case("GET") {
            self.get.as_ref()
        } else if method.eq_ignore_ascii_case("POST") {
            self.post.as_ref()
        } else if method.eq_ignore_ascii_case("PUT") {
            self.put.as_ref()
        } else if method.eq_ignore_ascii_case("PATCH") {
            self.patch.as_ref()
        } else if method.eq_ignore_ascii_case("DELETE") {
            self.delete.as_ref()
        } else if method.eq_ignore_ascii_case("HEAD") {
            self.head.as_ref()
        } else {
            None
        }
    }
}

impl Handler for MethodHandler {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        if let Some(handler) = self.select(req.method.as_str()) {
            handler.serve(w, req, ctx);
        } else if let Some(handler) = &self.method_not_allowed {
            handler.serve(w, req, ctx);
        } else {
            write_plain_status(w, StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}

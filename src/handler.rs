//! Handler contract shared by the router, middlewares and the transport.
//!
//! A handler is any value that, given a response writer, a request and the
//! per-request routing context, produces side effects on the writer. The
//! router itself implements [`Handler`], which is what makes router nesting
//! possible.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};

use crate::context::RouteContext;

/// A parsed HTTP request as seen by handlers.
///
/// Header names are stored lowercased. The path never contains the query
/// string; it is matched byte for byte and never percent-decoded.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Look up a header by its lowercased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Buffered response under construction.
///
/// Handlers set a status, append headers and write body bytes; the transport
/// serializes the finished value after the handler returns. Defaults to a
/// 200 response with no headers and an empty body.
#[derive(Debug)]
pub struct ResponseWriter {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Append a header. Repeated names are kept in insertion order.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First value for a header name, compared case-insensitively.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    pub fn write_str(&mut self, s: &str) {
        self.body.extend_from_slice(s.as_bytes());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn take_parts(self) -> (u16, Vec<(String, String)>, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

/// Capability implemented by everything the router can invoke.
///
/// Implementations must not retain the context or the request beyond the
/// call; the parameter storage is recycled once the routing pass returns.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext);
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseWriter, &mut Request, &mut RouteContext) + Send + Sync,
{
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        self(w, req, ctx)
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        (**self).serve(w, req, ctx)
    }
}

/// Write the canonical reason phrase for `status`, followed by a newline,
/// as a plain-text body.
pub(crate) fn write_plain_status(w: &mut ResponseWriter, status: StatusCode) {
    w.set_status(status.as_u16());
    w.header("Content-Type", "text/plain; charset=utf-8");
    w.write_str(status.canonical_reason().unwrap_or(""));
    w.write_str("\n");
}

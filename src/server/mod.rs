//! HTTP transport built on the `may` coroutine runtime.
//!
//! The transport is deliberately thin: it parses one request off the wire,
//! hands `(response writer, request)` to the router, and serializes the
//! finished response. Everything routing-related lives in
//! [`crate::router`]; everything here could be replaced by another
//! transport without touching it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pathmux::{HttpServer, Router};
//!
//! let mut router = Router::new();
//! router.handle("/health", |w: &mut pathmux::ResponseWriter, _req, _ctx| {
//!     w.write_str("ok");
//! })?;
//!
//! let handle = HttpServer(Arc::new(router)).start("0.0.0.0:8080")?;
//! handle.join().unwrap();
//! ```

pub mod http_server;
pub mod request;
pub mod response;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{read_request, ParsedRequest};
pub use response::write_response;

//! pathmux: an HTTP request multiplexer built on a compressed radix trie.
//!
//! Patterns mix literal runs with typed dynamic segments: `:name` binds one
//! path segment, `*name` binds the rest of the path, `#name:re` binds a
//! regex match, and a trailing `/` turns a pattern into a subtree that also
//! matches everything beneath it. Overlapping patterns resolve
//! deterministically (static first, then dynamic, with longest-prefix
//! subtree fallback), and a request that misses a subtree pattern only by
//! its trailing slash is answered with a 301.
//!
//! The hot path walks the trie without allocating beyond parameter
//! capture; after configuration a router is immutable and freely shared
//! across coroutines.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pathmux::{HttpServer, Router, ResponseWriter};
//!
//! let mut router = Router::new();
//! router.handle("/pets/:id", |w: &mut ResponseWriter, _req, ctx| {
//!     w.write_str(ctx.param("id").unwrap_or(""));
//! })?;
//!
//! HttpServer(Arc::new(router)).start("0.0.0.0:8080")?.join().unwrap();
//! ```

pub mod context;
pub mod handler;
pub mod method;
pub mod middleware;
pub mod router;
pub mod server;
pub mod strip;

pub use context::RouteContext;
pub use handler::{Handler, Request, ResponseWriter};
pub use method::MethodHandler;
pub use middleware::{with_middleware, Middleware};
pub use router::{Router, RouterError};
pub use server::{HttpServer, ServerHandle};
pub use strip::StripDepth;

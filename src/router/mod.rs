//! Path routing: pattern classification, the radix trie and the router.
//!
//! ## Overview
//!
//! Registration parses a pattern into literal runs and dynamic segments and
//! inserts it into a compressed radix trie, detecting conflicts as it goes.
//! Lookup walks the trie against the raw request path, captures named
//! parameters, and resolves overlapping patterns with a fixed precedence:
//!
//! 1. static children, in first-byte order;
//! 2. the catch-all child, then the wildcard child, then the regex child;
//! 3. a wildcard sibling of the most recent branch when the static branch
//!    dead-ends on a prefix mismatch;
//! 4. the deepest subtree (`.../`) value seen along the walk, as a final
//!    fallback.
//!
//! A request for a path that only misses a registered subtree pattern by
//! its trailing slash is answered with a permanent redirect instead of a
//! miss.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pathmux::{Router, Request, ResponseWriter};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.handle("/pets/:id", |w: &mut ResponseWriter, _req, ctx| {
//!     w.write_str(ctx.param("id").unwrap_or(""));
//! })?;
//!
//! let mut w = ResponseWriter::new();
//! let mut req = Request::new(Method::GET, "/pets/42");
//! router.route(&mut w, &mut req);
//! ```

mod core;
mod error;
mod pattern;
mod tree;


pub use core::Router;
pub use error::RouterError;

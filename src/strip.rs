//! Path-depth stripping: delegate to an inner handler with the request
//! path shortened past its first `n` segments.

use std::sync::Arc;

use crate::context::RouteContext;
use crate::handler::{Handler, Request, ResponseWriter};

/// Wrapper that replaces the request path with its tail past the first
/// `depth` `/`-delimited segments before invoking the inner handler, and
/// restores it afterwards.
///
/// [`crate::Router::mount`] uses this so a nested router sees paths
/// relative to its mount point. The original path stays observable through
/// [`RouteContext::original_path`].
pub struct StripDepth {
    depth: usize,
    inner: Arc<dyn Handler>,
}

impl StripDepth {
    pub fn new(depth: usize, inner: Arc<dyn Handler>) -> Self {
        Self { depth, inner }
    }
}

impl Handler for StripDepth {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        if self.depth == 0 {
            self.inner.serve(w, req, ctx);
            return;
        }
        let stripped = strip_depth(&req.path, self.depth).to_string();
        let original = std::mem::replace(&mut req.path, stripped);
        self.inner.serve(w, req, ctx);
        req.path = original;
    }
}

/// Drop everything up to and including the `depth`-th `/` found after
/// position zero. A missing leading slash is treated as if one were
/// present; when `depth` meets or exceeds the available segments the
/// result is `"/"`.
pub(crate) fn strip_depth(path: &str, depth: usize) -> &str {
    if depth == 0 || path.is_empty() {
        return path;
    }

    let bytes = path.as_bytes();
    let mut seen = 0;
    let mut i = 0;
    for (idx, &b) in bytes.iter().enumerate() {
        i = idx;
        if idx != 0 && b == b'/' {
            seen += 1;
        }
        if seen == depth {
            break;
        }
    }
    if i == path.len() - 1 {
        "/"
    } else {
        &path[i..]
    }
}

//! Per-request routing state: captured path parameters, the original
//! request path and the matched pattern.
//!
//! Contexts are recycled through a thread-local pool; the get/put cycle is
//! balanced inside a single routing pass, so handlers must copy anything
//! they want to keep (which is what [`RouteContext::params`] does).

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

/// Maximum number of path parameters held inline before spilling to the heap.
/// Most patterns bind no more than a handful of segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the routing hot path.
///
/// Names are shared `Arc<str>` clones of the strings stored in the route
/// tree at registration time; values are owned copies of path segments.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Per-request bag passed to every handler invocation.
#[derive(Debug, Default)]
pub struct RouteContext {
    params: ParamVec,
    original_path: String,
    pattern: String,
}

impl RouteContext {
    pub fn new(original_path: impl Into<String>) -> Self {
        Self {
            params: ParamVec::new(),
            original_path: original_path.into(),
            pattern: String::new(),
        }
    }

    /// Value bound to `name`, if any.
    ///
    /// Uses "last write wins" semantics: when nested routers bind the same
    /// name at different depths, the deepest binding is returned.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Copy of all bindings as a name-keyed map.
    ///
    /// The map is unordered; use [`RouteContext::params_ordered`] when the
    /// binding order matters. Returning a copy keeps callers safe from the
    /// context pool recycling the underlying storage.
    pub fn params(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Bindings in the order the pattern's dynamic segments matched.
    pub fn params_ordered(&self) -> &[(Arc<str>, String)] {
        &self.params
    }

    /// The pattern string the request matched, prefixed by the patterns of
    /// any parent routers when nested.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Request path as received by the outermost router, before any
    /// prefix stripping.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub(crate) fn params_mut(&mut self) -> &mut ParamVec {
        &mut self.params
    }

    /// Append `pattern` to the matched prefix, eliding a duplicate slash at
    /// the seam.
    pub(crate) fn join_pattern(&mut self, pattern: &str) {
        if self.pattern.is_empty() {
            self.pattern.push_str(pattern);
        } else if self.pattern.ends_with('/') && pattern.starts_with('/') {
            self.pattern.push_str(&pattern[1..]);
        } else {
            self.pattern.push_str(pattern);
        }
    }

    fn reset(&mut self, original_path: &str) {
        self.params.clear();
        self.original_path.clear();
        self.original_path.push_str(original_path);
        self.pattern.clear();
    }
}

thread_local! {
    static CONTEXT_POOL: RefCell<Vec<RouteContext>> = const { RefCell::new(Vec::new()) };
}

/// Take a cleared context from the pool, or allocate a fresh one.
pub(crate) fn acquire(original_path: &str) -> RouteContext {
    let recycled = CONTEXT_POOL.with(|pool| pool.borrow_mut().pop());
    match recycled {
        Some(mut ctx) => {
            ctx.reset(original_path);
            ctx
        }
        None => RouteContext::new(original_path),
    }
}

/// Return a context to the pool. Must be paired with [`acquire`] inside the
/// same routing pass.
pub(crate) fn release(ctx: RouteContext) {
    CONTEXT_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        if pool.len() < 64 {
            pool.push(ctx);
        }
    });
}

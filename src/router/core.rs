//! Router: registration surface and the request hot path.
//!
//! The router owns one route tree, the middleware chains applied at
//! registration time, and the not-found, method-not-allowed and redirect
//! handlers. Lookup is CPU-only and returns synchronously; after
//! configuration the router is read-only and can be shared across
//! coroutines behind an `Arc` without further synchronization.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, info, warn};

use super::error::RouterError;
use super::pattern;
use super::tree::{Found, Node, RouteValue};
use crate::context::{self, RouteContext};
use crate::handler::{write_plain_status, Handler, Request, ResponseWriter};
use crate::method::MethodHandler;
use crate::middleware::{with_middleware, Middleware};
use crate::strip::StripDepth;

/// HTTP request multiplexer over a compressed radix trie.
///
/// Patterns are registered with [`Router::handle`]; each request is mapped
/// to exactly one of the matched handler, a synthesized trailing-slash
/// redirect, or the not-found handler.
///
/// A router is itself a [`Handler`], so it can be registered under a prefix
/// of another router; see [`Router::mount`].
pub struct Router {
    root: Node,
    middlewares: Vec<Middleware>,
    globals: Vec<Middleware>,
    not_found: Option<Arc<dyn Handler>>,
    method_not_allowed: Option<Arc<dyn Handler>>,
    match_trailing_slash: Option<bool>,
    // Globals-wrapped entry points, rebuilt whenever either input changes.
    not_found_entry: Arc<dyn Handler>,
    redirect_entry: Arc<dyn Handler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            middlewares: Vec::new(),
            globals: Vec::new(),
            not_found: None,
            method_not_allowed: None,
            match_trailing_slash: None,
            not_found_entry: default_not_found(),
            redirect_entry: default_redirect(),
        }
    }

    /// Allow a request for `/foo/` to match a pattern registered as `/foo`
    /// (and `/foo/value/` to match `/foo/:id`) when nothing more specific
    /// matches. Off by default.
    ///
    /// The option never applies inside a catch-all match: a catch-all
    /// consumes the remainder of the path, trailing slash included.
    pub fn set_match_trailing_slash(&mut self, enabled: bool) {
        self.match_trailing_slash = Some(enabled);
    }

    /// Append a middleware applied to every handler registered from now on.
    /// Routes registered before this call are not affected.
    pub fn use_middleware(&mut self, middleware: Middleware) {
        self.middlewares.push(middleware);
    }

    /// Append a middleware that additionally wraps the not-found and
    /// redirect handlers, ahead of the chain from [`Router::use_middleware`].
    pub fn use_global(&mut self, middleware: Middleware) {
        self.globals.push(middleware);
        self.rebuild_entries();
    }

    /// Replace the handler invoked when no pattern matches.
    pub fn set_not_found_handler<H: Handler + 'static>(&mut self, handler: H) {
        self.not_found = Some(Arc::new(handler));
        self.rebuild_entries();
    }

    /// Replace the handler that [`MethodHandler`] leaves registered through
    /// [`Router::register_methods`] fall back to.
    pub fn set_method_not_allowed_handler<H: Handler + 'static>(&mut self, handler: H) {
        self.method_not_allowed = Some(Arc::new(handler));
    }

    fn rebuild_entries(&mut self) {
        let not_found = self.not_found.clone().unwrap_or_else(default_not_found);
        self.not_found_entry = with_middleware(not_found, &self.globals);
        self.redirect_entry = with_middleware(default_redirect(), &self.globals);
    }

    /// Register `handler` under `pattern`.
    ///
    /// A pattern ending in `/` is a subtree pattern and also matches any
    /// path it prefixes. Registration fails on conflicts with previously
    /// registered patterns; the error names the offending pattern.
    pub fn handle<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        self.handle_with(pattern, handler, &[])
    }

    /// Like [`Router::handle`], with call-site middlewares appended after
    /// the router's configured chain. The first middleware listed runs
    /// first.
    pub fn handle_with<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        middlewares: &[Middleware],
    ) -> Result<(), RouterError> {
        pattern::validate(pattern)?;

        let mut chain =
            Vec::with_capacity(self.globals.len() + self.middlewares.len() + middlewares.len());
        chain.extend(self.globals.iter().cloned());
        chain.extend(self.middlewares.iter().cloned());
        chain.extend(middlewares.iter().cloned());

        let handler = with_middleware(Arc::new(handler), &chain);
        self.root.insert(
            pattern,
            RouteValue {
                handler,
                pattern: Arc::from(pattern),
            },
        )
    }

    /// Register `methods` under `pattern`, filling an unset per-leaf
    /// method-not-allowed fallback with the router's configured one.
    pub fn register_methods(
        &mut self,
        pattern: &str,
        mut methods: MethodHandler,
    ) -> Result<(), RouterError> {
        if methods.method_not_allowed.is_none() {
            methods.method_not_allowed = self.method_not_allowed.clone();
        }
        self.handle(pattern, methods)
    }

    /// Register `child` as the handler for `pattern` and the subtree below
    /// it, stripping the mount prefix from the path before the child runs.
    ///
    /// The child inherits this router's not-found and method-not-allowed
    /// handlers and trailing-slash option where its own are unset, and this
    /// router's global middlewares run ahead of the child's.
    pub fn mount(&mut self, pattern: &str, child: Router) -> Result<(), RouterError> {
        self.mount_with(pattern, child, &[])
    }

    /// Like [`Router::mount`], with call-site middlewares.
    pub fn mount_with(
        &mut self,
        pattern: &str,
        mut child: Router,
        middlewares: &[Middleware],
    ) -> Result<(), RouterError> {
        pattern::validate(pattern)?;
        child.inherit(self);

        let depth = pattern.split('/').filter(|s| !s.is_empty()).count();
        let stripped = Arc::new(StripDepth::new(depth, Arc::new(child) as Arc<dyn Handler>));

        if pattern.ends_with('/') {
            self.handle_with(pattern, stripped, middlewares)
        } else {
            // Serve both the mount point itself and everything below it.
            self.handle_with(&format!("{pattern}/"), Arc::clone(&stripped), middlewares)?;
            self.handle_with(pattern, stripped, middlewares)
        }
    }

    fn inherit(&mut self, parent: &Router) {
        if self.not_found.is_none() {
            self.not_found = parent.not_found.clone();
        }
        if self.method_not_allowed.is_none() {
            self.method_not_allowed = parent.method_not_allowed.clone();
        }
        if self.match_trailing_slash.is_none() {
            self.match_trailing_slash = parent.match_trailing_slash;
        }
        if !parent.globals.is_empty() {
            let mut globals = parent.globals.clone();
            globals.append(&mut self.globals);
            self.globals = globals;
        }
        self.rebuild_entries();
    }

    /// Route one request: look the path up, then invoke exactly one of the
    /// matched handler, the redirect handler or the not-found handler.
    ///
    /// This is the transport entry point; it owns the routing context for
    /// the duration of the call and returns it to a pool afterwards.
    pub fn route(&self, w: &mut ResponseWriter, req: &mut Request) {
        let mut ctx = context::acquire(&req.path);
        self.dispatch(w, req, &mut ctx);
        context::release(ctx);
    }

    fn dispatch(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        debug!(method = %req.method, path = %req.path, "route lookup");

        let match_trailing_slash = self.match_trailing_slash.unwrap_or(false);
        let found = self
            .root
            .lookup(&req.path, ctx.params_mut(), match_trailing_slash);

        match found {
            Some(Found::Route(value)) => {
                ctx.join_pattern(&value.pattern);
                info!(
                    method = %req.method,
                    path = %req.path,
                    pattern = %ctx.pattern(),
                    "route matched"
                );
                value.handler.serve(w, req, ctx);
            }
            Some(Found::Redirect { pattern }) => {
                ctx.join_pattern(pattern);
                info!(
                    method = %req.method,
                    path = %req.path,
                    "redirecting to subtree"
                );
                self.redirect_entry.serve(w, req, ctx);
            }
            None => {
                warn!(method = %req.method, path = %req.path, "no route matched");
                self.not_found_entry.serve(w, req, ctx);
            }
        }
    }
}

impl Handler for Router {
    /// Re-run lookup on the current request path, reusing the caller's
    /// routing context. This is what executes when a router is mounted
    /// inside another router.
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext) {
        self.dispatch(w, req, ctx);
    }
}

fn default_not_found() -> Arc<dyn Handler> {
    Arc::new(
        |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
            write_plain_status(w, StatusCode::NOT_FOUND);
        },
    )
}

/// 301 with `Location: <original request path>/`, no body. Uses the path as
/// captured before any prefix stripping so nested routers redirect to the
/// externally visible location.
fn default_redirect() -> Arc<dyn Handler> {
    Arc::new(
        |w: &mut ResponseWriter, _req: &mut Request, ctx: &mut RouteContext| {
            w.header("Location", format!("{}/", ctx.original_path()));
            w.set_status(StatusCode::MOVED_PERMANENTLY.as_u16());
        },
    )
}

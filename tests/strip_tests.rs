//! The path-depth stripping wrapper, on its own and composed with routers.

use std::sync::Arc;

use http::Method;
use pathmux::{Handler, Request, ResponseWriter, RouteContext, Router, StripDepth};

fn path_echo() -> Arc<dyn Handler> {
    Arc::new(
        |w: &mut ResponseWriter, req: &mut Request, _ctx: &mut RouteContext| {
            w.write_str(&req.path);
        },
    )
}

fn invoke(handler: &dyn Handler, path: &str) -> (ResponseWriter, Request) {
    let mut w = ResponseWriter::new();
    let mut req = Request::new(Method::GET, path);
    let mut ctx = RouteContext::new(path);
    handler.serve(&mut w, &mut req, &mut ctx);
    (w, req)
}

#[test]
fn strip_depth_table() {
    let cases = [
        ("/input", 0, "/input"),
        ("/my/path", 20, "/"),
        ("/some/long/segment", 2, "/segment"),
        ("some/long/segment", 2, "/segment"),
    ];

    for (input, depth, expected) in cases {
        let wrapper = StripDepth::new(depth, path_echo());
        let (w, _) = invoke(&wrapper, input);
        assert_eq!(
            w.body(),
            expected.as_bytes(),
            "{input:?} at depth {depth}"
        );
    }
}

#[test]
fn the_request_path_is_restored_after_the_inner_call() {
    let wrapper = StripDepth::new(1, path_echo());
    let (w, req) = invoke(&wrapper, "/outer/inner");
    assert_eq!(w.body(), b"/inner");
    assert_eq!(req.path, "/outer/inner");
}

#[test]
fn stripped_router_matches_relative_patterns() {
    let mut inner = Router::new();
    inner
        .handle(
            "/items/:id",
            |w: &mut ResponseWriter, _req: &mut Request, ctx: &mut RouteContext| {
                w.write_str(ctx.param("id").unwrap_or(""));
            },
        )
        .unwrap();

    let wrapper = StripDepth::new(2, Arc::new(inner) as Arc<dyn Handler>);
    let (w, _) = invoke(&wrapper, "/v1/tenant/items/abc");
    assert_eq!(w.body(), b"abc");
}

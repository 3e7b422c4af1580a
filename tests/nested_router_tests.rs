//! Router composition: mounting one router inside another, prefix
//! stripping, option inheritance and middleware layering.

use std::sync::Arc;

use http::Method;
use pathmux::middleware::from_fn;
use pathmux::{Handler, Request, ResponseWriter, RouteContext, Router};

fn send(router: &Router, method: Method, path: &str) -> ResponseWriter {
    let mut w = ResponseWriter::new();
    let mut req = Request::new(method, path);
    router.route(&mut w, &mut req);
    w
}

fn header_tag(name: &'static str) -> pathmux::Middleware {
    from_fn(move |inner: Arc<dyn Handler>| {
        Arc::new(
            move |w: &mut ResponseWriter, req: &mut Request, ctx: &mut RouteContext| {
                w.header("x-header", name);
                inner.serve(w, req, ctx);
            },
        ) as Arc<dyn Handler>
    })
}

#[test]
fn mounted_router_sees_paths_relative_to_the_mount_point() {
    let mut child = Router::new();
    child
        .handle(
            "/path/:id",
            |w: &mut ResponseWriter, _req: &mut Request, ctx: &mut RouteContext| {
                w.header("x-pattern", ctx.pattern());
                w.header("x-nested", ctx.param("nested").unwrap_or(""));
                w.header("x-id", ctx.param("id").unwrap_or(""));
                w.write_str("found");
            },
        )
        .unwrap();

    let mut parent = Router::new();
    parent.mount("/some/deeply/:nested/", child).unwrap();

    let w = send(&parent, Method::GET, "/some/deeply/nested/path/id");
    assert_eq!(w.status(), 200);
    assert_eq!(w.body(), b"found");
    assert_eq!(w.get_header("x-nested"), Some("nested"));
    assert_eq!(w.get_header("x-id"), Some("id"));
    assert_eq!(
        w.get_header("x-pattern"),
        Some("/some/deeply/:nested/path/:id")
    );
}

#[test]
fn parent_params_remain_visible_in_the_child() {
    let mut child = Router::new();
    child
        .handle(
            "/child/:childID",
            |w: &mut ResponseWriter, _req: &mut Request, ctx: &mut RouteContext| {
                let params = ctx.params();
                w.header("x-root", params.get("rootID").cloned().unwrap_or_default());
                w.header(
                    "x-child",
                    params.get("childID").cloned().unwrap_or_default(),
                );
            },
        )
        .unwrap();

    let mut parent = Router::new();
    parent.mount("/root/:rootID", child).unwrap();

    let w = send(&parent, Method::GET, "/root/1/child/2");
    assert_eq!(w.status(), 200);
    assert_eq!(w.get_header("x-root"), Some("1"));
    assert_eq!(w.get_header("x-child"), Some("2"));
}

#[test]
fn mount_without_trailing_slash_serves_the_mount_point_itself() {
    let mut child = Router::new();
    child
        .handle(
            "/",
            |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
                w.write_str("index");
            },
        )
        .unwrap();

    let mut parent = Router::new();
    parent.mount("/api", child).unwrap();

    let w = send(&parent, Method::GET, "/api");
    assert_eq!(w.body(), b"index");
}

#[test]
fn children_inherit_unset_not_found_and_trailing_slash_options() {
    let mut root = Router::new();
    root.set_not_found_handler(
        |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
            w.set_status(404);
            w.write_str("are you lost?");
        },
    );

    let mut api = Router::new();
    api.handle(
        "/crud",
        |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
            w.write_str("API CRUD CALLED");
        },
    )
    .unwrap();
    api.set_not_found_handler(
        |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
            w.set_status(404);
            w.write_str("no matching api route");
        },
    );

    let mut assets = Router::new();
    assets.set_match_trailing_slash(true);
    assets
        .handle(
            "/image.jpg",
            |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
                w.write_str("IMAGE.JPG");
            },
        )
        .unwrap();

    let mut root_router = root;
    root_router.mount("/api", api).unwrap();
    root_router.mount("/assets", assets).unwrap();

    let w = send(&root_router, Method::GET, "/api/crud");
    assert_eq!(w.status(), 200);
    assert_eq!(w.body(), b"API CRUD CALLED");

    // The api child keeps strict trailing-slash matching and its own 404.
    let w = send(&root_router, Method::GET, "/api/crud/");
    assert_eq!(w.status(), 404);
    assert_eq!(w.body(), b"no matching api route");

    let w = send(&root_router, Method::GET, "/assets/image.jpg");
    assert_eq!(w.body(), b"IMAGE.JPG");

    // The assets child opted into trailing-slash matching.
    let w = send(&root_router, Method::GET, "/assets/image.jpg/");
    assert_eq!(w.body(), b"IMAGE.JPG");

    // The assets child has no 404 of its own and inherits the root's.
    let w = send(&root_router, Method::GET, "/assets/unknown.mp4");
    assert_eq!(w.status(), 404);
    assert_eq!(w.body(), b"are you lost?");
}

#[test]
fn parent_middlewares_wrap_the_mounted_router() {
    let mut child = Router::new();
    child
        .handle_with(
            "/child",
            |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
                w.write_str("ok");
            },
            &[header_tag("child")],
        )
        .unwrap();

    let mut parent = Router::new();
    parent.use_middleware(header_tag("parent"));
    parent
        .handle(
            "/parent",
            |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
                w.write_str("ok");
            },
        )
        .unwrap();
    parent.mount("/registered", child).unwrap();

    let w = send(&parent, Method::GET, "/parent");
    let tags: Vec<&str> = w
        .headers()
        .iter()
        .filter(|(k, _)| k == "x-header")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(tags, vec!["parent"]);

    let w = send(&parent, Method::GET, "/registered/child");
    let tags: Vec<&str> = w
        .headers()
        .iter()
        .filter(|(k, _)| k == "x-header")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(tags, vec!["parent", "child"]);
}

#[test]
fn parent_globals_wrap_the_childs_not_found_handler() {
    let mut parent = Router::new();
    parent.use_global(header_tag("global"));

    let child = Router::new();
    parent.mount("/sub", child).unwrap();

    let w = send(&parent, Method::GET, "/sub/missing");
    assert_eq!(w.status(), 404);
    assert_eq!(w.get_header("x-header"), Some("global"));
}

#[test]
fn redirects_inside_a_mount_use_the_original_path() {
    let mut child = Router::new();
    child
        .handle(
            "/docs/",
            |w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext| {
                w.write_str("docs");
            },
        )
        .unwrap();

    let mut parent = Router::new();
    parent.mount("/api", child).unwrap();

    let w = send(&parent, Method::GET, "/api/docs");
    assert_eq!(w.status(), 301);
    assert_eq!(w.get_header("Location"), Some("/api/docs/"));
}

use http::Method;
use pathmux::{Request, ResponseWriter, RouteContext, Router, RouterError};

fn noop(_w: &mut ResponseWriter, _req: &mut Request, _ctx: &mut RouteContext) {}

#[derive(Debug, PartialEq)]
enum Expected {
    Ok,
    Err(RouterError),
}

#[test]
fn registration_error_table() {
    let cases: Vec<(&str, Vec<&str>, Expected)> = vec![
        (
            "register same route twice",
            vec!["/api", "/api"],
            Expected::Err(RouterError::MultipleRegistrations {
                pattern: "/api".to_string(),
            }),
        ),
        (
            "route without slash prefix",
            vec!["api"],
            Expected::Err(RouterError::MissingLeadingSlash {
                pattern: "api".to_string(),
            }),
        ),
        (
            "register same wildcard route twice",
            vec!["/api/:id", "/api/:id"],
            Expected::Err(RouterError::MultipleRegistrations {
                pattern: "/api/:id".to_string(),
            }),
        ),
        (
            "conflicting wildcard names",
            vec!["/api/:id", "/api/:resource/value"],
            Expected::Err(RouterError::MismatchedWildcards {
                existing: ":id".to_string(),
                requested: ":resource".to_string(),
            }),
        ),
        (
            "no errors",
            vec!["/api", "/api/", "/api/:id", "/api/:id/other"],
            Expected::Ok,
        ),
        (
            "empty pattern",
            vec![""],
            Expected::Err(RouterError::EmptyPattern),
        ),
        (
            "segments after catch-all",
            vec!["/*catchall/segment"],
            Expected::Err(RouterError::SegmentsAfterCatchAll {
                segment: "*catchall".to_string(),
            }),
        ),
        (
            "multiple catch-all registrations",
            vec!["/*catch", "/*catch"],
            Expected::Err(RouterError::MultipleRegistrations {
                pattern: "/*catch".to_string(),
            }),
        ),
        (
            "catch-all name mismatch",
            vec!["/*catch", "/*all"],
            Expected::Err(RouterError::MismatchedWildcards {
                existing: "*catch".to_string(),
                requested: "*all".to_string(),
            }),
        ),
        (
            "nameless wildcard",
            vec!["/api/:"],
            Expected::Err(RouterError::EmptyWildcardName {
                segment: ":".to_string(),
            }),
        ),
        (
            "malformed regex segment",
            vec!["/v/#num:[0-9"],
            Expected::Err(RouterError::InvalidRegexSegment {
                segment: "#num:[0-9".to_string(),
                reason: String::new(),
            }),
        ),
    ];

    for (name, patterns, expected) in cases {
        let mut router = Router::new();
        let mut outcome = Expected::Ok;
        for pattern in patterns {
            if let Err(err) = router.handle(pattern, noop) {
                outcome = Expected::Err(err);
                break;
            }
        }
        match (&expected, &outcome) {
            // The regex error text comes from the regex crate; only compare
            // the variant and segment for that case.
            (
                Expected::Err(RouterError::InvalidRegexSegment { segment: a, .. }),
                Expected::Err(RouterError::InvalidRegexSegment { segment: b, .. }),
            ) => assert_eq!(a, b, "{name}"),
            _ => assert_eq!(expected, outcome, "{name}"),
        }
    }
}

#[test]
fn failed_registration_keeps_existing_routes_working() {
    let mut router = Router::new();
    router.handle("/user/:id", noop).unwrap();
    assert!(router.handle("/user/:name/profile", noop).is_err());

    let mut w = ResponseWriter::new();
    let mut req = Request::new(Method::GET, "/user/7");
    router.route(&mut w, &mut req);
    assert_eq!(w.status(), 200);
}

#[test]
fn error_messages_name_the_conflict() {
    let err = RouterError::MismatchedWildcards {
        existing: ":id".to_string(),
        requested: ":resource".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "mismatched wildcards \":id\" and \":resource\""
    );

    let err = RouterError::MultipleRegistrations {
        pattern: "/api".to_string(),
    };
    assert_eq!(err.to_string(), "multiple registrations for pattern \"/api\"");
}

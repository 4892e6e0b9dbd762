use bytes::Bytes;
use htransform::middleware::headers::{HeadersTransformation, Rule, TransformConfig};
use htransform::middleware::{
    handle_middleware_error, Middleware, MiddlewareChain, MiddlewareError, Request, Response,
};
use http_body_util::{BodyExt, Full};
use hyper::header::HOST;
use hyper::StatusCode;

fn transformation(name: &str, rules: Vec<Rule>) -> HeadersTransformation {
    HeadersTransformation::new(name, &TransformConfig::new(rules)).unwrap()
}

fn request() -> Request {
    hyper::Request::builder()
        .uri("/")
        .header(HOST, "example.com")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn response() -> Response {
    hyper::Response::builder()
        .header("header-a", "downstream")
        .header("server", "app/1.0")
        .body(Full::new(Bytes::from("ok")))
        .unwrap()
}

#[tokio::test]
async fn test_middleware_request_and_response() {
    let middleware = transformation(
        "headers",
        vec![
            Rule::new("host", "Set").header("Host").value("example.org"),
            Rule::new("resp", "Set").header("Header-A").value("configured").on_response(),
        ],
    );
    assert_eq!(middleware.name(), "headers");

    let req = middleware.handle_request(request()).await.unwrap();
    assert_eq!(req.headers()[HOST], "example.org");
    assert!(!req.headers().contains_key("header-a"));

    let res = middleware.handle_response(response()).await.unwrap();
    assert_eq!(res.headers()["header-a"], "configured");
}

#[tokio::test]
async fn test_chain_runs_responses_in_reverse() {
    let mut chain = MiddlewareChain::new();
    chain.add(transformation(
        "first",
        vec![
            Rule::new("req", "Set").header("X-Order").value("first"),
            Rule::new("resp", "Join").header("Server").values(["first"]).sep(" ").on_response(),
        ],
    ));
    chain.add(transformation(
        "second",
        vec![
            Rule::new("req", "Join").header("X-Order").values(["second"]).sep(","),
            Rule::new("resp", "Join").header("Server").values(["second"]).sep(" ").on_response(),
        ],
    ));
    assert_eq!(chain.names(), vec!["first", "second"]);

    let req = chain.handle_request(request()).await.unwrap();
    assert_eq!(req.headers()["x-order"], "first,second");

    let res = chain.handle_response(response()).await.unwrap();
    assert_eq!(res.headers()["server"], "app/1.0 second first");
}

#[tokio::test]
async fn test_apply_failure_maps_to_internal_error() {
    let middleware = transformation(
        "broken",
        vec![Rule::new("bad", "Set").header("X-Bad").value("a\nb")],
    );

    let err = middleware.handle_request(request()).await.unwrap_err();
    assert!(matches!(err, MiddlewareError::Apply { ref middleware, .. } if middleware == "broken"));

    let res = handle_middleware_error(&err);
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[test]
fn test_invalid_rules_rejected_at_construction() {
    let config = TransformConfig::new(vec![Rule::new("join rule with no sep", "Join")
        .header("X-A")
        .values(["b"])]);

    match HeadersTransformation::new("broken", &config) {
        Err(MiddlewareError::Rule { middleware, source }) => {
            assert_eq!(middleware, "broken");
            assert_eq!(source.rule(), "join rule with no sep");
        }
        other => panic!("expected rule error, got {:?}", other.map(|_| ())),
    }
}

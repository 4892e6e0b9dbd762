use htransform::middleware::headers::{
    serve_stack, HeadersTransformation, ResponseRecorder, ResponseSink, Rule, SinkError,
    TransformConfig,
};
use hyper::header::HOST;
use hyper::{HeaderMap, Request, StatusCode};
use std::cell::RefCell;

fn middleware(rules: Vec<Rule>) -> HeadersTransformation {
    HeadersTransformation::new("test", &TransformConfig::new(rules)).unwrap()
}

fn request() -> Request<()> {
    Request::builder()
        .uri("/foo")
        .header(HOST, "example.com")
        .body(())
        .unwrap()
}

/// 다운스트림이 본 요청 헤더를 기록하고 고정된 응답을 씁니다.
struct Recording {
    seen: RefCell<Option<HeaderMap>>,
}

impl Recording {
    fn new() -> Self {
        Self { seen: RefCell::new(None) }
    }

    fn seen(&self) -> HeaderMap {
        self.seen.borrow().clone().expect("downstream was not called")
    }
}

impl htransform::middleware::headers::Downstream<()> for Recording {
    fn serve(&self, req: Request<()>, sink: &mut dyn ResponseSink) -> Result<(), SinkError> {
        *self.seen.borrow_mut() = Some(req.headers().clone());
        sink.headers_mut().insert("header-a", "downstream".parse().unwrap());
        sink.write_status(StatusCode::OK)?;
        sink.write(b"done")?;
        Ok(())
    }
}

#[test]
fn test_request_rules_reach_downstream() {
    let middleware = middleware(vec![
        Rule::new("set", "Set").header("X-Custom").value("value"),
        Rule::new("rename", "Rename").header("^Referer$").value("X-Referer"),
    ]);
    let downstream = Recording::new();
    let mut req = request();
    req.headers_mut().insert("referer", "http://foo.bar".parse().unwrap());

    let response = middleware.serve_buffered(req, &downstream);
    let seen = downstream.seen();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(seen["x-custom"], "value");
    assert_eq!(seen["x-referer"], "http://foo.bar");
    assert!(!seen.contains_key("referer"));
}

#[test]
fn test_host_indirection() {
    let middleware = middleware(vec![Rule::new("host", "Set").header("Host").value("example.org")]);
    let downstream = Recording::new();

    middleware.serve_buffered(request(), &downstream);
    let seen = downstream.seen();

    assert_eq!(seen.get_all(HOST).iter().collect::<Vec<_>>(), vec!["example.org"]);
}

#[test]
fn test_response_phase_deferral() {
    let middleware = middleware(vec![Rule::new("resp", "Set")
        .header("Header-A")
        .value("configured")
        .on_response()]);
    let downstream = Recording::new();
    let mut req = request();
    req.headers_mut().insert("header-a", "from-client".parse().unwrap());

    let response = middleware.serve_buffered(req, &downstream);

    assert_eq!(downstream.seen()["header-a"], "from-client");
    assert_eq!(response.headers()["header-a"], "configured");
}

#[test]
fn test_response_rules_fire_on_first_body_write() {
    let middleware = middleware(vec![Rule::new("resp", "RewriteValueRule")
        .header("^Location$")
        .value(r"http://internal(/.*)")
        .value_replace("https://public.example.com$1")
        .on_response()]);

    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        sink.headers_mut().insert("location", "http://internal/login".parse().unwrap());
        sink.write(b"redirecting")?;
        // 커밋 이후의 헤더 변경은 응답에 반영되지 않음
        sink.headers_mut().insert("x-late", "ignored".parse().unwrap());
        Ok(())
    };

    let response = middleware.serve_buffered(request(), &next);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["location"], "https://public.example.com/login");
    assert!(!response.headers().contains_key("x-late"));
}

#[test]
fn test_failed_request_rule_is_not_forwarded() {
    let middleware = middleware(vec![
        Rule::new("ok", "Set").header("X-Before").value("1"),
        Rule::new("broken", "Rename").header("X-Source").value("bad name"),
    ]);
    let downstream = Recording::new();
    let mut req = request();
    req.headers_mut().insert("x-source", "v".parse().unwrap());

    let mut recorder = ResponseRecorder::new();
    middleware.serve(req, &mut recorder, &downstream).unwrap();

    assert!(downstream.seen.borrow().is_none());
    assert_eq!(recorder.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(recorder.body(), b"Internal Server Error");
}

#[test]
fn test_failed_response_rule_returns_internal_error() {
    let middleware = middleware(vec![Rule::new("broken", "Set")
        .header("X-Bad")
        .value("line\nbreak")
        .on_response()]);
    let downstream = Recording::new();

    let response = middleware.serve_buffered(request(), &downstream);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.headers().contains_key("header-a"));
}

#[test]
fn test_downstream_without_writes_skips_response_rules() {
    let middleware = middleware(vec![
        Rule::new("resp", "Set").header("X-A").value("a").on_response(),
        Rule::new("strip", "Del").header("X-App").on_response(),
    ]);
    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        sink.headers_mut().insert("x-app", "kept".parse().unwrap());
        Ok(())
    };

    let response = middleware.serve_buffered(request(), &next);

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-a"));
    assert_eq!(response.headers()["x-app"], "kept");
}

#[test]
fn test_stacked_middlewares_without_writes_keep_headers() {
    let layers = vec![
        middleware(vec![Rule::new("outer", "Set").header("X-Outer").value("o").on_response()]),
        middleware(vec![Rule::new("inner", "Set").header("X-Inner").value("i").on_response()]),
    ];
    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        sink.headers_mut().insert("x-app", "kept".parse().unwrap());
        Ok(())
    };

    let response = serve_stack(&layers, request(), &next);

    assert_eq!(response.headers()["x-app"], "kept");
    assert!(!response.headers().contains_key("x-outer"));
    assert!(!response.headers().contains_key("x-inner"));
}

#[test]
fn test_hijack_through_middleware() {
    let middleware = middleware(vec![]);
    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        sink.hijack().map(|_| ())
    };

    let upgrade = hyper::upgrade::on(&mut Request::new(()));
    let mut with_upgrade = ResponseRecorder::with_upgrade(upgrade);
    middleware.serve(request(), &mut with_upgrade, &next).unwrap();
    assert!(with_upgrade.is_hijacked());

    let mut plain = ResponseRecorder::new();
    let result = middleware.serve(request(), &mut plain, &next);
    assert!(matches!(result, Err(SinkError::HijackUnsupported)));
}

#[test]
fn test_serve_stack_hijack_requires_upgrade_request() {
    let layers = vec![middleware(vec![])];
    let outcome = RefCell::new(None);
    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        let hijacked = sink.hijack().map(|_| ());
        let unsupported = matches!(hijacked, Err(SinkError::HijackUnsupported));
        *outcome.borrow_mut() = Some(unsupported);
        sink.write_status(StatusCode::OK)?;
        sink.write(b"plain")?;
        Ok(())
    };

    let response = serve_stack(&layers, request(), &next);

    assert_eq!(*outcome.borrow(), Some(true));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_serve_stack_hands_upgrade_to_downstream() {
    let layers = vec![middleware(vec![])];
    let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        sink.hijack()?;
        Ok(())
    };
    let mut req = request();
    let upgrade = hyper::upgrade::on(&mut Request::new(()));
    req.extensions_mut().insert(upgrade);

    let response = serve_stack(&layers, req, &next);

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_stacked_middlewares() {
    let outer = middleware(vec![
        Rule::new("outer-req", "Set").header("X-Order").value("outer"),
        Rule::new("outer-resp", "Join")
            .header("X-Trail")
            .values(["outer"])
            .sep(",")
            .on_response(),
    ]);
    let inner = middleware(vec![
        Rule::new("inner-req", "Join").header("X-Order").values(["inner"]).sep(","),
        Rule::new("inner-resp", "Join")
            .header("X-Trail")
            .values(["inner"])
            .sep(",")
            .on_response(),
    ]);
    let layers = vec![outer, inner];

    let next = |req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
        let order = req.headers()["x-order"].clone();
        sink.headers_mut().insert("x-order", order);
        sink.headers_mut().insert("x-trail", "app".parse().unwrap());
        sink.write_status(StatusCode::NO_CONTENT)
    };

    let response = serve_stack(&layers, request(), &next);

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["x-order"], "outer,inner");
    assert_eq!(response.headers()["x-trail"], "app,inner,outer");
}

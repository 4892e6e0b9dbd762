use htransform::middleware::headers::{
    Engine, HeadersTransformation, Rule, RuleError, TransformConfig,
};
use htransform::middleware::MiddlewareError;
use hyper::header::HOST;
use hyper::Request;
use std::io::Write;

#[test]
fn test_validation_table() {
    let cases: Vec<(&str, Vec<Rule>, bool)> = vec![
        ("no rules", vec![], false),
        ("no rules type", vec![Rule::new("no rule", "")], true),
        (
            "invalid rules type",
            vec![Rule::new("invalid rule", "THIS IS NOT A VALID RULE TYPE")],
            true,
        ),
        ("missing header", vec![Rule::new("rule with no header", "Join")], true),
        (
            "missing type",
            vec![Rule::new("rule with no type", "").header("not-empty")],
            true,
        ),
        (
            "join rule without value",
            vec![Rule::new("join", "Join").header("not-empty").sep("not-empty")],
            true,
        ),
        (
            "join rule without separator",
            vec![Rule::new("join", "Join").header("not-empty").value("not-empty")],
            true,
        ),
        (
            "rewrite rule without ValueReplace",
            vec![Rule::new("rewrite", "RewriteValueRule").header("not-empty")],
            true,
        ),
        (
            "valid rules",
            vec![
                Rule::new("delete rule", "Del").header("not-empty"),
                Rule::new("join rule", "Join")
                    .header("not-empty")
                    .values(["not-empty"])
                    .sep("not-empty"),
                Rule::new("rename rule", "Rename").header("not-empty").value("not-empty"),
                Rule::new("rewrite rule", "RewriteValueRule")
                    .header("not-empty")
                    .value_replace("not-empty")
                    .value("not-empty"),
                Rule::new("set rule", "Set").header("not-empty").value("not-empty"),
            ],
            false,
        ),
    ];

    for (name, rules, want_err) in cases {
        let result = Engine::new(&rules);
        assert_eq!(result.is_err(), want_err, "case {:?}", name);
    }
}

#[test]
fn test_error_names_offending_rule() {
    let rules = vec![Rule::new("broken rename", "Rename").header("(").value("X")];

    let err = Engine::new(&rules).unwrap_err();
    assert!(matches!(err, RuleError::InvalidRegexp { .. }));
    assert!(err.to_string().contains("broken rename"));
}

#[test]
fn test_toml_file_to_engine() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
        [[Rules]]
        Name = "move host"
        Type = "Rename"
        Header = "^Host$"
        Value = "X-Original-Host"

        [[Rules]]
        Name = "new host"
        Type = "Set"
        Header = "Host"
        Value = "backend.internal"

        [[Rules]]
        Name = "forwarded"
        Type = "Join"
        Header = "X-Forwarded-For"
        Values = ["^X-Original-Host"]
        Sep = ", "
        HeaderPrefix = "^"
        "#
    )
    .unwrap();

    let config = TransformConfig::from_file(file.path()).unwrap();
    let engine = Engine::new(&config.rules).unwrap();

    let mut req = Request::builder()
        .uri("/")
        .header(HOST, "example.com")
        .header("x-forwarded-for", "10.0.0.1")
        .body(())
        .unwrap();
    engine.apply_request(&mut req).unwrap();

    assert_eq!(req.headers()[HOST], "backend.internal");
    assert_eq!(req.headers()["x-original-host"], "example.com");
    assert_eq!(req.headers()["x-forwarded-for"], "10.0.0.1, example.com");
}

#[test]
fn test_json_file_to_engine() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let json = r#"{"Rules": [
        {"Name": "strip", "Type": "Del", "Header": "Server", "SetOnResponse": true}
    ]}"#;
    file.write_all(json.as_bytes()).unwrap();

    let config = TransformConfig::from_file(file.path()).unwrap();
    let engine = Engine::new(&config.rules).unwrap();

    assert!(engine.request_handlers().is_empty());
    assert_eq!(engine.response_handlers().len(), 1);
}

#[test]
fn test_missing_file() {
    assert!(TransformConfig::from_file("/nonexistent/htransform.toml").is_err());
}

#[test]
fn test_transformation_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
        [[Rules]]
        Name = "tag"
        Type = "Set"
        Header = "X-Proxy"
        Value = "htransform"
        "#
    )
    .unwrap();

    let middleware = HeadersTransformation::from_file("tag", file.path()).unwrap();
    assert_eq!(middleware.engine().request_handlers().len(), 1);

    let err = HeadersTransformation::from_file("missing", "/nonexistent/rules.toml").unwrap_err();
    assert!(matches!(err, MiddlewareError::Config(_)));
}

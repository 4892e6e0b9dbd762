//! htransform 은 순서가 있는 선언적 규칙으로 HTTP 헤더를 변환하는 미들웨어입니다.
//!
//! # 주요 기능
//!
//! - 요청 헤더 변환 (다운스트림 호출 전)
//! - 응답 헤더 변환 (응답 커밋 직전)
//! - `Set`, `Del`, `Rename`, `Join`, `RewriteValueRule` 규칙
//! - `Host` 의사 헤더 지원
//!
//! # 예제
//!
//! ```
//! use htransform::middleware::headers::{Engine, Rule};
//! use hyper::Request;
//!
//! let rules = vec![
//!     Rule::new("set host", "Set").header("Host").value("example.org"),
//!     Rule::new("hide server", "Del").header("Server").on_response(),
//! ];
//! let engine = Engine::new(&rules).unwrap();
//!
//! let mut req = Request::builder()
//!     .uri("http://example.com/")
//!     .body(())
//!     .unwrap();
//! engine.apply_request(&mut req).unwrap();
//!
//! assert_eq!(req.headers()["host"], "example.org");
//! ```
//!
//! # 응답 헤더 변환
//!
//! ```
//! use htransform::middleware::headers::{
//!     HeadersTransformation, ResponseSink, Rule, SinkError, TransformConfig,
//! };
//! use hyper::{Request, StatusCode};
//!
//! let config = TransformConfig::new(vec![
//!     Rule::new("branding", "Set").header("X-Powered-By").value("htransform").on_response(),
//! ]);
//! let middleware = HeadersTransformation::new("demo", &config).unwrap();
//!
//! let next = |_req: Request<()>, sink: &mut dyn ResponseSink| -> Result<(), SinkError> {
//!     sink.headers_mut().insert("x-powered-by", "app".parse().unwrap());
//!     sink.write_status(StatusCode::OK)?;
//!     sink.write(b"ok")?;
//!     Ok(())
//! };
//!
//! let response = middleware.serve_buffered(Request::new(()), &next);
//! assert_eq!(response.headers()["x-powered-by"], "htransform");
//! ```

pub mod logging;
pub mod middleware;
pub mod settings;

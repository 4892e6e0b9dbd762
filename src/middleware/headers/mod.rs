//! 헤더 변환 미들웨어
//!
//! 순서가 있는 규칙 목록으로 요청 헤더(다운스트림 호출 전)와
//! 응답 헤더(응답 커밋 직전)를 변환합니다.
//!
//! 지원하는 규칙: `Set`, `Del`, `Rename`, `Join`, `RewriteValueRule`.
//! `Host` 는 헤더 맵 밖에 있는 의사 헤더로 취급되지만 다른 헤더와 똑같이
//! 설정, 삭제, 이름 변경, 연결할 수 있습니다.

pub mod accessor;
mod config;
mod engine;
mod error;
pub mod handler;
mod middleware;
mod rule;
mod sink;

pub use accessor::{canonical_name, HeaderAccessor, RequestView};
pub use config::{ConfigError, TransformConfig};
pub use engine::Engine;
pub use error::{ApplyError, RuleError, SinkError};
pub use handler::Handler;
pub use middleware::{serve_stack, Downstream, HeadersTransformation};
pub use rule::{Rule, RuleType};
pub use sink::{DeferredResponseSink, ResponseRecorder, ResponseSink};

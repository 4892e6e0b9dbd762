use super::headers::{ApplyError, ConfigError, RuleError, SinkError};

#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),

    #[error("미들웨어 {middleware} 규칙 오류: {source}")]
    Rule {
        middleware: String,
        #[source]
        source: RuleError,
    },

    #[error("미들웨어 {middleware} 실행 실패: {source}")]
    Apply {
        middleware: String,
        #[source]
        source: ApplyError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

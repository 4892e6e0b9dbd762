/// 규칙 검증 오류 (엔진 생성 시점에만 발생)
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid rule type `{kind}`: {rule}")]
    InvalidRuleType { rule: String, kind: String },

    #[error("invalid regexp `{pattern}`: {rule}: {source}")]
    InvalidRegexp {
        rule: String,
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("missing required field {field}: {rule}")]
    MissingRequiredFields { rule: String, field: &'static str },
}

impl RuleError {
    /// 오류를 일으킨 규칙의 이름
    pub fn rule(&self) -> &str {
        match self {
            Self::InvalidRuleType { rule, .. }
            | Self::InvalidRegexp { rule, .. }
            | Self::MissingRequiredFields { rule, .. } => rule,
        }
    }
}

/// 요청 처리 중 규칙 적용 실패
///
/// 규칙이 만들어낸 이름이나 값을 HTTP 헤더로 표현할 수 없을 때 발생합니다.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    #[error("invalid value for header `{name}`: {value:?}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("rule {rule} failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: Box<ApplyError>,
    },
}

impl ApplyError {
    pub(crate) fn in_rule(self, rule: &str) -> Self {
        Self::Rule {
            rule: rule.to_string(),
            source: Box::new(self),
        }
    }
}

/// 응답 싱크 오류
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("response sink does not support hijacking")]
    HijackUnsupported,

    #[error("connection already hijacked")]
    AlreadyHijacked,

    #[error("response aborted after a failed header transformation")]
    Aborted,

    #[error(transparent)]
    Transform(#[from] ApplyError),
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// 규칙 종류
///
/// 설정에 알 수 없는 문자열이 들어와도 파싱은 성공하고
/// 엔진 생성 시점에 `InvalidRuleType` 으로 거부됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    Set,
    Delete,
    Rename,
    Join,
    RewriteValue,
    Unknown(String),
    #[default]
    Empty,
}

impl RuleType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Set => "Set",
            Self::Delete => "Del",
            Self::Rename => "Rename",
            Self::Join => "Join",
            Self::RewriteValue => "RewriteValueRule",
            Self::Unknown(raw) => raw,
            Self::Empty => "",
        }
    }
}

impl From<String> for RuleType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Set" => Self::Set,
            "Del" => Self::Delete,
            "Rename" => Self::Rename,
            "Join" => Self::Join,
            "RewriteValueRule" => Self::RewriteValue,
            "" => Self::Empty,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for RuleType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RuleType> for String {
    fn from(kind: RuleType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 헤더 변환 규칙 하나
///
/// 설정 파일의 형태를 그대로 따르며, 검증은 [`Handler`](super::handler::Handler)
/// 생성 시점에 이루어집니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Rule {
    /// 에러 메시지에만 쓰이는 규칙 이름
    pub name: String,

    #[serde(rename = "Type")]
    pub rule_type: RuleType,

    /// 대상 헤더 이름 (Rename/RewriteValueRule 에서는 이름 매칭 정규식)
    pub header: String,

    /// Set: 값, Rename: 새 헤더 이름, RewriteValueRule: 값 매칭 정규식
    pub value: String,

    /// `$1`, `$2` 치환자를 포함하는 템플릿
    pub value_replace: String,

    /// Join 으로 이어 붙일 값 목록
    pub values: Vec<String>,

    pub sep: String,

    /// `Values` 항목이 다른 헤더를 참조함을 나타내는 접두사
    pub header_prefix: String,

    /// true 면 응답 단계에서 적용
    pub set_on_response: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, rule_type: impl Into<RuleType>) -> Self {
        Self {
            name: name.into(),
            rule_type: rule_type.into(),
            ..Default::default()
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value_replace(mut self, template: impl Into<String>) -> Self {
        self.value_replace = template.into();
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    pub fn header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_prefix = prefix.into();
        self
    }

    pub fn on_response(mut self) -> Self {
        self.set_on_response = true;
        self
    }
}

use super::rule::Rule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 헤더 변환 미들웨어 설정
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TransformConfig {
    /// 적용 순서대로 나열된 규칙
    #[serde(rename = "Rules", alias = "rules", default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("설정 파일 {path} 읽기 실패: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML 파싱 오류: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransformConfig {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 확장자가 `.json` 이면 JSON, 그 외에는 TOML 로 읽습니다.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }
}

use super::headers::TransformConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 이름이 붙은 헤더 변환 미들웨어 인스턴스 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MiddlewareConfig {
    /// 미들웨어 활성화 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 실행 순서 (낮은 숫자가 먼저 실행)
    #[serde(default)]
    pub order: i32,

    /// 규칙 목록
    #[serde(flatten)]
    pub transform: TransformConfig,
}

fn default_enabled() -> bool {
    true
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: 0,
            transform: TransformConfig::default(),
        }
    }
}

impl MiddlewareConfig {
    /// 활성화된 설정만 실행 순서대로 정렬합니다. 순서가 같으면 이름 순입니다.
    pub fn ordered(configs: &HashMap<String, Self>) -> Vec<(&str, &Self)> {
        let mut ordered: Vec<_> = configs
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(name, config)| (name.as_str(), config))
            .collect();
        ordered.sort_by(|a, b| a.1.order.cmp(&b.1.order).then_with(|| a.0.cmp(b.0)));
        ordered
    }
}

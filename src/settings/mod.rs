use std::{collections::HashMap, env, fs, path::Path};
use serde::Deserialize;
use tracing::{debug, info};
use crate::middleware::{
    headers::HeadersTransformation, MiddlewareChain, MiddlewareConfig, MiddlewareError,
};

mod error;
pub mod logging;
mod server;

pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use server::{parse_env_var, ServerSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 이름별 헤더 변환 미들웨어 설정
    #[serde(default)]
    pub middlewares: HashMap<String, MiddlewareConfig>,
}

impl Settings {
    /// `HTRANSFORM_CONFIG_FILE` 이 있으면 파일에서, 없으면 환경 변수에서 읽습니다.
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("HTRANSFORM_CONFIG_FILE") {
            Self::from_toml_file(&config_path)
        } else {
            Self::from_env()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings = Self::from_toml_str(&content)?;
        info!(
            path = %path.as_ref().display(),
            middlewares = settings.middlewares.len(),
            "설정 파일 로드 완료"
        );
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SettingsError::ParseError { source: e })
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            middlewares: HashMap::new(),
        })
    }

    /// 활성화된 미들웨어를 실행 순서대로 생성합니다.
    ///
    /// 하나라도 규칙이 잘못되었으면 전체가 실패합니다.
    pub fn build_layers(&self) -> std::result::Result<Vec<HeadersTransformation>, MiddlewareError> {
        MiddlewareConfig::ordered(&self.middlewares)
            .into_iter()
            .map(|(name, config)| {
                debug!(middleware = %name, order = config.order, "미들웨어 생성");
                HeadersTransformation::new(name, &config.transform)
            })
            .collect()
    }

    /// [`build_layers`](Self::build_layers) 결과를 비동기 [`MiddlewareChain`] 으로 묶습니다.
    pub fn build_chain(&self) -> std::result::Result<MiddlewareChain, MiddlewareError> {
        let mut chain = MiddlewareChain::new();
        for layer in self.build_layers()? {
            chain.add(layer);
        }
        Ok(chain)
    }
}

use serde::Deserialize;
use std::env;
use super::SettingsError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ServerSettings {
    /// 바인딩 주소 (기본값: 0.0.0.0)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP 포트 (기본값: 8080)
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_bind_address() -> String { "0.0.0.0".to_string() }
fn default_http_port() -> u16 { 8080 }

pub fn parse_env_var<T, F>(name: &str, default: F) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: FnOnce() -> T,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    // 포트 파싱 전용 함수
    fn parse_port(name: &str, value: &str) -> Result<u16, SettingsError> {
        let port = value.parse::<u16>().map_err(|_| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: value.to_string(),
            reason: "포트는 1-65535 범위여야 합니다".to_string(),
        })?;

        if port == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: name.to_string(),
                value: value.to_string(),
                reason: "포트는 0이 될 수 없습니다".to_string(),
            });
        }

        Ok(port)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        let http_port = Self::parse_port(
            "HTRANSFORM_HTTP_PORT",
            &env::var("HTRANSFORM_HTTP_PORT").unwrap_or_else(|_| default_http_port().to_string())
        )?;

        Ok(Self {
            bind_address: parse_env_var("HTRANSFORM_BIND_ADDRESS", default_bind_address)?,
            http_port,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
        }
    }
}

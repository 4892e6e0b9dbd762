use super::error::ApplyError;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use hyper::Request;

/// 일반 헤더와 `Host` 의사 헤더(pseudo-header)를 같은 방식으로 다루는 인터페이스
///
/// 모든 규칙 핸들러는 헤더 저장소를 직접 건드리지 않고 이 트레이트만 사용합니다.
/// 헤더 이름은 대소문자를 구분하지 않습니다.
pub trait HeaderAccessor {
    /// 첫 번째 값을 반환합니다. 없으면 빈 문자열.
    fn get(&self, name: &str) -> String;

    fn contains(&self, name: &str) -> bool;

    /// 기존 값을 모두 지우고 하나의 값으로 덮어씁니다.
    fn set(&mut self, name: &str, value: &str) -> Result<(), ApplyError>;

    /// 값을 추가합니다. `Host` 의 경우 문자열 뒤에 이어 붙입니다.
    fn add(&mut self, name: &str, value: &str) -> Result<(), ApplyError>;

    fn delete(&mut self, name: &str);

    /// 현재 헤더 목록의 스냅샷. 이름은 정규화된 형태(`X-Forwarded-For`)입니다.
    fn snapshot(&self) -> Vec<(String, Vec<String>)>;
}

pub fn is_host(name: &str) -> bool {
    name.eq_ignore_ascii_case("host")
}

/// `x-forwarded-for` 를 `X-Forwarded-For` 형태로 바꿉니다.
pub fn canonical_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn header_name(name: &str) -> Result<HeaderName, ApplyError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ApplyError::InvalidHeaderName(name.to_string()))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ApplyError> {
    HeaderValue::from_str(value).map_err(|_| ApplyError::InvalidHeaderValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn lossy(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// 응답 헤더 뷰. 응답에서는 `Host` 도 일반 헤더입니다.
impl HeaderAccessor for HeaderMap {
    fn get(&self, name: &str) -> String {
        HeaderMap::get(self, name).map(lossy).unwrap_or_default()
    }

    fn contains(&self, name: &str) -> bool {
        HeaderMap::contains_key(self, name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ApplyError> {
        let value = header_value(name, value)?;
        HeaderMap::insert(self, header_name(name)?, value);
        Ok(())
    }

    fn add(&mut self, name: &str, value: &str) -> Result<(), ApplyError> {
        let value = header_value(name, value)?;
        HeaderMap::append(self, header_name(name)?, value);
        Ok(())
    }

    fn delete(&mut self, name: &str) {
        HeaderMap::remove(self, name);
    }

    fn snapshot(&self) -> Vec<(String, Vec<String>)> {
        self.keys()
            .map(|name| {
                let values = self.get_all(name).iter().map(lossy).collect();
                (canonical_name(name.as_str()), values)
            })
            .collect()
    }
}

/// 요청 헤더 뷰
///
/// `Host` 는 헤더 맵에서 떼어내 별도 문자열로 들고 있다가 [`commit`](Self::commit)
/// 시점에 다시 `Host` 헤더로 기록합니다.
#[derive(Debug)]
pub struct RequestView<'a> {
    headers: &'a mut HeaderMap,
    host: String,
}

impl<'a> RequestView<'a> {
    /// `Host` 헤더가 없으면 URI authority 를 호스트로 사용합니다.
    pub fn new<B>(req: &'a mut Request<B>) -> Self {
        let authority = req.uri().authority().map(|a| a.as_str().to_string());
        let headers = req.headers_mut();
        let host = headers
            .remove(HOST)
            .map(|v| lossy(&v))
            .or(authority)
            .unwrap_or_default();

        Self { headers, host }
    }

    pub fn from_parts(headers: &'a mut HeaderMap, host: impl Into<String>) -> Self {
        headers.remove(HOST);
        Self {
            headers,
            host: host.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }

    /// 호스트 값을 `Host` 헤더로 되돌려 씁니다. 비어 있으면 헤더를 남기지 않습니다.
    pub fn commit(self) -> Result<(), ApplyError> {
        if !self.host.is_empty() {
            let value = header_value("Host", &self.host)?;
            self.headers.insert(HOST, value);
        }
        Ok(())
    }
}

impl HeaderAccessor for RequestView<'_> {
    fn get(&self, name: &str) -> String {
        if is_host(name) {
            return self.host.clone();
        }
        HeaderAccessor::get(&*self.headers, name)
    }

    fn contains(&self, name: &str) -> bool {
        if is_host(name) {
            return !self.host.is_empty();
        }
        HeaderAccessor::contains(&*self.headers, name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ApplyError> {
        if is_host(name) {
            self.host = value.to_string();
            return Ok(());
        }
        HeaderAccessor::set(&mut *self.headers, name, value)
    }

    fn add(&mut self, name: &str, value: &str) -> Result<(), ApplyError> {
        if is_host(name) {
            // 기존 동작 유지: 다중 값이 아니라 문자열 연결
            self.host.push_str(value);
            return Ok(());
        }
        HeaderAccessor::add(&mut *self.headers, name, value)
    }

    fn delete(&mut self, name: &str) {
        if is_host(name) {
            self.host.clear();
            return;
        }
        HeaderAccessor::delete(&mut *self.headers, name);
    }

    fn snapshot(&self) -> Vec<(String, Vec<String>)> {
        let mut entries = Vec::with_capacity(self.headers.keys_len() + 1);
        if !self.host.is_empty() {
            entries.push(("Host".to_string(), vec![self.host.clone()]));
        }
        entries.extend(HeaderAccessor::snapshot(&*self.headers));
        entries
    }
}

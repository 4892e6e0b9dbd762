use super::engine::Engine;
use super::error::SinkError;
use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::upgrade::OnUpgrade;
use hyper::{HeaderMap, Response, StatusCode};
use tracing::{debug, error};

/// 다운스트림 핸들러가 응답을 쓰는 대상
///
/// 첫 `write_status` 또는 첫 `write` 호출이 커밋 지점이며,
/// 그 이후에는 헤더를 바꿔도 실제 응답에 반영되지 않습니다.
pub trait ResponseSink {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_status(&mut self, status: StatusCode) -> Result<(), SinkError>;

    /// 커밋 전이라면 `200 OK` 로 커밋한 뒤 본문을 씁니다.
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError>;

    /// 연결 업그레이드(hijack). 지원하지 않는 싱크는 `HijackUnsupported` 를 반환합니다.
    fn hijack(&mut self) -> Result<OnUpgrade, SinkError> {
        Err(SinkError::HijackUnsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitState {
    Pending,
    Committed,
    Failed,
}

/// 응답 단계 규칙을 커밋 직전에 한 번만 실행하는 싱크 래퍼
///
/// 커밋 전까지는 자체 헤더 버퍼를 노출하고, 커밋 시 규칙을 적용한 결과를
/// 실제 싱크에 넘긴 뒤 트리거가 된 호출을 그대로 전달합니다.
pub struct DeferredResponseSink<'a> {
    inner: &'a mut dyn ResponseSink,
    engine: &'a Engine,
    headers: HeaderMap,
    state: CommitState,
}

impl<'a> DeferredResponseSink<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink, engine: &'a Engine) -> Self {
        let headers = inner.headers().clone();
        Self {
            inner,
            engine,
            headers,
            state: CommitState::Pending,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.state != CommitState::Pending
    }

    /// 다운스트림 처리가 끝났을 때 호출합니다.
    ///
    /// 한 번도 커밋되지 않았다면 버퍼의 헤더를 규칙 적용 없이 실제 싱크로 넘깁니다.
    pub fn finish(self) {
        if self.state == CommitState::Pending {
            debug!("커밋 없이 종료, 응답 헤더 변환 생략");
            *self.inner.headers_mut() = self.headers;
        }
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        match self.state {
            CommitState::Committed => return Ok(()),
            CommitState::Failed => return Err(SinkError::Aborted),
            CommitState::Pending => {}
        }

        let mut headers = std::mem::take(&mut self.headers);
        match self.engine.apply_response(&mut headers) {
            Ok(()) => {
                debug!(rules = self.engine.response_handlers().len(), "응답 헤더 변환 완료");
                *self.inner.headers_mut() = headers;
                self.state = CommitState::Committed;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "응답 헤더 변환 실패");
                self.state = CommitState::Failed;
                self.inner.headers_mut().clear();
                self.inner.write_status(StatusCode::INTERNAL_SERVER_ERROR)?;
                Err(SinkError::Transform(e))
            }
        }
    }
}

impl ResponseSink for DeferredResponseSink<'_> {
    fn headers(&self) -> &HeaderMap {
        match self.state {
            CommitState::Pending => &self.headers,
            _ => self.inner.headers(),
        }
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        match self.state {
            CommitState::Pending => &mut self.headers,
            _ => self.inner.headers_mut(),
        }
    }

    fn write_status(&mut self, status: StatusCode) -> Result<(), SinkError> {
        self.commit()?;
        self.inner.write_status(status)
    }

    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        self.commit()?;
        self.inner.write(chunk)
    }

    fn hijack(&mut self) -> Result<OnUpgrade, SinkError> {
        self.inner.hijack()
    }
}

/// 응답을 메모리에 기록하는 싱크
///
/// hyper 서비스에서는 다운스트림 실행이 끝난 뒤 [`into_response`](Self::into_response)
/// 로 실제 응답을 만듭니다.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    headers: HeaderMap,
    status: Option<StatusCode>,
    committed: Option<HeaderMap>,
    body: BytesMut,
    upgrade: Option<OnUpgrade>,
    hijacked: bool,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 업그레이드 가능한 연결에 대한 싱크
    pub fn with_upgrade(upgrade: OnUpgrade) -> Self {
        Self {
            upgrade: Some(upgrade),
            ..Self::default()
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// 커밋 시점에 고정된 헤더. 아직 커밋되지 않았다면 `None`.
    pub fn committed_headers(&self) -> Option<&HeaderMap> {
        self.committed.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_hijacked(&self) -> bool {
        self.hijacked
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.committed.unwrap_or(self.headers);
        response
    }
}

impl ResponseSink for ResponseRecorder {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) -> Result<(), SinkError> {
        if self.hijacked {
            return Err(SinkError::AlreadyHijacked);
        }
        if self.status.is_some() {
            debug!(%status, "이미 커밋된 응답에 대한 상태 코드 무시");
            return Ok(());
        }

        self.status = Some(status);
        self.committed = Some(self.headers.clone());
        Ok(())
    }

    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        if self.status.is_none() {
            self.write_status(StatusCode::OK)?;
        }
        if self.hijacked {
            return Err(SinkError::AlreadyHijacked);
        }

        self.body.extend_from_slice(chunk);
        Ok(chunk.len())
    }

    fn hijack(&mut self) -> Result<OnUpgrade, SinkError> {
        if self.hijacked {
            return Err(SinkError::AlreadyHijacked);
        }
        let upgrade = self.upgrade.take().ok_or(SinkError::HijackUnsupported)?;
        self.hijacked = true;
        Ok(upgrade)
    }
}

use super::config::TransformConfig;
use super::engine::Engine;
use super::error::SinkError;
use super::sink::{DeferredResponseSink, ResponseRecorder, ResponseSink};
use crate::middleware::{Middleware, MiddlewareError, Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::upgrade::OnUpgrade;
use hyper::StatusCode;
use std::path::Path;
use tracing::{error, instrument};

/// 미들웨어 뒤에서 실제 응답을 만드는 핸들러
pub trait Downstream<B> {
    fn serve(&self, req: hyper::Request<B>, sink: &mut dyn ResponseSink) -> Result<(), SinkError>;
}

impl<B, F> Downstream<B> for F
where
    F: Fn(hyper::Request<B>, &mut dyn ResponseSink) -> Result<(), SinkError>,
{
    fn serve(&self, req: hyper::Request<B>, sink: &mut dyn ResponseSink) -> Result<(), SinkError> {
        self(req, sink)
    }
}

/// 헤더 변환 미들웨어
///
/// 요청 단계 규칙은 다운스트림 호출 전에 요청에 바로 적용하고,
/// 응답 단계 규칙은 [`DeferredResponseSink`] 를 통해 응답 커밋 직전에 적용합니다.
#[derive(Debug, Clone)]
pub struct HeadersTransformation {
    name: String,
    engine: Engine,
}

impl HeadersTransformation {
    pub fn new(name: impl Into<String>, config: &TransformConfig) -> Result<Self, MiddlewareError> {
        let name = name.into();
        let engine = Engine::new(&config.rules).map_err(|source| {
            error!(middleware = %name, error = %source, "헤더 변환 규칙 검증 실패");
            MiddlewareError::Rule {
                middleware: name.clone(),
                source,
            }
        })?;

        Ok(Self { name, engine })
    }

    /// 규칙 파일(`.toml` 또는 `.json`)에서 미들웨어를 만듭니다.
    pub fn from_file(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, MiddlewareError> {
        let config = TransformConfig::from_file(path)?;
        Self::new(name, &config)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// 요청 단계 규칙이 실패하면 다운스트림을 호출하지 않고 500 으로 응답합니다.
    #[instrument(skip_all, fields(middleware = %self.name))]
    pub fn serve<B, D>(
        &self,
        mut req: hyper::Request<B>,
        sink: &mut dyn ResponseSink,
        next: &D,
    ) -> Result<(), SinkError>
    where
        D: Downstream<B> + ?Sized,
    {
        if let Err(e) = self.engine.apply_request(&mut req) {
            error!(error = %e, "요청 헤더 변환 실패");
            return internal_error(sink);
        }

        let mut sink = DeferredResponseSink::new(sink, &self.engine);
        let result = next.serve(req, &mut sink);
        sink.finish();
        result
    }

    /// 다운스트림 결과를 메모리에 받아 hyper 응답으로 돌려줍니다.
    pub fn serve_buffered<B, D>(
        &self,
        req: hyper::Request<B>,
        next: &D,
    ) -> hyper::Response<Full<Bytes>>
    where
        D: Downstream<B> + ?Sized,
    {
        serve_stack(std::slice::from_ref(self), req, next)
    }
}

/// 여러 변환 미들웨어를 순서대로 겹쳐 다운스트림 앞에 둡니다.
///
/// 첫 번째 미들웨어가 가장 바깥쪽입니다.
pub fn serve_stack<B, D>(
    layers: &[HeadersTransformation],
    mut req: hyper::Request<B>,
    next: &D,
) -> hyper::Response<Full<Bytes>>
where
    D: Downstream<B> + ?Sized,
{
    // 업그레이드 요청일 때만 hyper 가 핸들을 넣어 둡니다.
    let mut recorder = match req.extensions_mut().remove::<OnUpgrade>() {
        Some(upgrade) => ResponseRecorder::with_upgrade(upgrade),
        None => ResponseRecorder::new(),
    };
    let stack = Remaining { layers, next };

    if let Err(e) = stack.serve(req, &mut recorder) {
        error!(error = %e, "응답 처리 실패");
        if recorder.status().is_none() {
            let _ = internal_error(&mut recorder);
        }
    }

    recorder.into_response()
}

struct Remaining<'a, D: ?Sized> {
    layers: &'a [HeadersTransformation],
    next: &'a D,
}

impl<B, D> Downstream<B> for Remaining<'_, D>
where
    D: Downstream<B> + ?Sized,
{
    fn serve(&self, req: hyper::Request<B>, sink: &mut dyn ResponseSink) -> Result<(), SinkError> {
        match self.layers.split_first() {
            Some((layer, rest)) => layer.serve(
                req,
                sink,
                &Remaining {
                    layers: rest,
                    next: self.next,
                },
            ),
            None => self.next.serve(req, sink),
        }
    }
}

fn internal_error(sink: &mut dyn ResponseSink) -> Result<(), SinkError> {
    sink.headers_mut().clear();
    sink.write_status(StatusCode::INTERNAL_SERVER_ERROR)?;
    sink.write(b"Internal Server Error")?;
    Ok(())
}

/// 버퍼링된 응답에 대한 미들웨어 체인용 구현
///
/// 완성된 응답이 넘어오는 시점을 커밋 지점으로 보고 응답 단계 규칙을 적용합니다.
#[async_trait]
impl Middleware for HeadersTransformation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_request(&self, mut req: Request) -> Result<Request, MiddlewareError> {
        self.engine
            .apply_request(&mut req)
            .map_err(|source| MiddlewareError::Apply {
                middleware: self.name.clone(),
                source,
            })?;
        Ok(req)
    }

    async fn handle_response(&self, mut res: Response) -> Result<Response, MiddlewareError> {
        self.engine
            .apply_response(res.headers_mut())
            .map_err(|source| MiddlewareError::Apply {
                middleware: self.name.clone(),
                source,
            })?;
        Ok(res)
    }
}

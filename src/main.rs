use std::convert::Infallible;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use htransform::logging::{self, log_request, RequestLog};
use htransform::middleware::headers::{serve_stack, HeadersTransformation, ResponseSink, SinkError};
use htransform::settings::Settings;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};
use uuid::Uuid;

/// 변환된 요청 헤더를 그대로 본문에 적어 돌려주는 데모 핸들러
fn echo(req: Request<Incoming>, sink: &mut dyn ResponseSink) -> Result<(), SinkError> {
    let mut body = String::new();
    for (name, value) in req.headers() {
        let _ = writeln!(body, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }

    sink.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    sink.write_status(StatusCode::OK)?;
    sink.write(body.as_bytes())?;
    Ok(())
}

fn handle(layers: &[HeadersTransformation], req: Request<Incoming>) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let mut log = RequestLog::new(Uuid::new_v4().to_string());
    log.with_request(&req);

    let response = serve_stack(layers, req, &echo);

    log.duration_ms = started.elapsed().as_millis() as u64;
    log.with_response(response.status());
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        log.with_error("헤더 변환 실패");
    }
    log_request(&log);
    response
}

#[tokio::main]
async fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = logging::init_logging(&settings.logging);

    // 규칙이 하나라도 잘못되면 시작하지 않음
    let layers = match settings.build_layers() {
        Ok(layers) => Arc::new(layers),
        Err(e) => {
            error!(error = %e, "미들웨어 생성 실패");
            std::process::exit(1);
        }
    };

    let address = settings.server.listen_address();
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, address = %address, "HTTP 포트 바인딩 실패");
            std::process::exit(1);
        }
    };
    info!(address = %address, middlewares = layers.len(), "HTTP 리스너 시작");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "HTTP 연결 수락 실패");
                continue;
            }
        };

        let layers = layers.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let layers = layers.clone();
                async move { Ok::<_, Infallible>(handle(&layers, req)) }
            });

            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service)
                .with_upgrades()
                .await
            {
                error!(error = %err, peer = %peer, "HTTP 연결 처리 실패");
            }
        });
    }
}

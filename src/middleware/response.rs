use super::{MiddlewareError, Response};
use bytes::Bytes;
use http_body_util::Full;
use hyper::StatusCode;

/// 미들웨어 에러를 HTTP 응답으로 변환합니다.
///
/// 헤더 변환 실패는 요청을 그대로 넘기지 않고 500 으로 막습니다.
pub fn handle_middleware_error(err: &MiddlewareError) -> Response {
    let status = match err {
        MiddlewareError::Config(_)
        | MiddlewareError::Rule { .. }
        | MiddlewareError::Apply { .. }
        | MiddlewareError::Sink(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut response = Response::new(Full::new(Bytes::from(
        status.canonical_reason().unwrap_or("Internal Server Error"),
    )));
    *response.status_mut() = status;
    response
}

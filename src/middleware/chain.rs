use super::{Middleware, MiddlewareError, Request, Response};
use std::sync::Arc;

/// 비동기 [`Middleware`] 체인
///
/// 완성된 요청과 응답을 주고받는 라이브러리 사용자를 위한 통합 지점입니다.
/// 데모 서버는 스트리밍 싱크 경로인 [`serve_stack`](super::headers::serve_stack) 을 사용합니다.
#[derive(Default, Clone)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub async fn handle_request(&self, mut request: Request) -> Result<Request, MiddlewareError> {
        for middleware in &self.middlewares {
            request = middleware.handle_request(request).await?;
        }
        Ok(request)
    }

    pub async fn handle_response(
        &self,
        mut response: Response,
    ) -> Result<Response, MiddlewareError> {
        // 응답은 역순으로 처리
        for middleware in self.middlewares.iter().rev() {
            response = middleware.handle_response(response).await?;
        }
        Ok(response)
    }
}

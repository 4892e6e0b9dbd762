use super::accessor::{HeaderAccessor, RequestView};
use super::error::{ApplyError, RuleError};
use super::handler::Handler;
use super::rule::Rule;
use hyper::{HeaderMap, Request};
use tracing::{debug, info};

/// 규칙 목록으로부터 만들어진 변환 엔진
///
/// 생성 이후에는 읽기 전용이며 여러 요청이 동시에 공유할 수 있습니다.
/// 각 단계 안에서는 설정에 적힌 순서대로 적용되고, 뒤의 규칙은 앞 규칙의 결과를 봅니다.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    request_handlers: Vec<Handler>,
    response_handlers: Vec<Handler>,
}

impl Engine {
    /// 규칙 하나라도 유효하지 않으면 전체 생성이 실패합니다.
    pub fn new(rules: &[Rule]) -> Result<Self, RuleError> {
        let mut request_handlers = Vec::with_capacity(rules.len());
        let mut response_handlers = Vec::with_capacity(rules.len());

        for rule in rules {
            let handler = Handler::new(rule)?;
            debug!(
                rule = %rule.name,
                kind = %rule.rule_type,
                on_response = rule.set_on_response,
                "규칙 등록"
            );

            if rule.set_on_response {
                response_handlers.push(handler);
            } else {
                request_handlers.push(handler);
            }
        }

        info!(
            request_rules = request_handlers.len(),
            response_rules = response_handlers.len(),
            "헤더 변환 엔진 생성 완료"
        );

        Ok(Self {
            request_handlers,
            response_handlers,
        })
    }

    pub fn request_handlers(&self) -> &[Handler] {
        &self.request_handlers
    }

    pub fn response_handlers(&self) -> &[Handler] {
        &self.response_handlers
    }

    pub fn has_response_rules(&self) -> bool {
        !self.response_handlers.is_empty()
    }

    /// 요청 단계 규칙을 요청에 직접 적용합니다.
    ///
    /// 실패하면 그 이전 규칙들의 변경은 남아 있으므로 요청을 더 전달해서는 안 됩니다.
    pub fn apply_request<B>(&self, req: &mut Request<B>) -> Result<(), ApplyError> {
        if self.request_handlers.is_empty() {
            return Ok(());
        }

        let mut view = RequestView::new(req);
        self.apply_request_view(&mut view)?;
        view.commit()
    }

    pub fn apply_request_view(&self, view: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        run(&self.request_handlers, view)
    }

    /// 응답 단계 규칙을 커밋 직전의 응답 헤더에 적용합니다.
    pub fn apply_response(&self, headers: &mut HeaderMap) -> Result<(), ApplyError> {
        run(&self.response_handlers, headers)
    }
}

fn run(handlers: &[Handler], headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
    for handler in handlers {
        debug!(rule = %handler.name(), kind = %handler.kind(), "규칙 적용");
        handler.apply(headers)?;
    }
    Ok(())
}

use super::{HeaderAccessor, Rule, RuleError};

/// `Del`: 헤더를 삭제합니다. 없는 헤더를 지우는 것은 아무 일도 하지 않습니다.
#[derive(Debug, Clone)]
pub struct Deleter {
    pub(super) name: String,
    header: String,
}

impl Deleter {
    pub fn validate(_rule: &Rule) -> Result<(), RuleError> {
        Ok(())
    }

    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        Self::validate(rule)?;
        Ok(Self {
            name: rule.name.clone(),
            header: rule.header.clone(),
        })
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) {
        if self.header.is_empty() {
            return;
        }
        headers.delete(&self.header);
    }
}

use super::{require, ApplyError, HeaderAccessor, Rule, RuleError};

/// `Set`: 헤더 값을 무조건 덮어씁니다.
#[derive(Debug, Clone)]
pub struct Setter {
    pub(super) name: String,
    header: String,
    value: String,
}

impl Setter {
    pub fn validate(rule: &Rule) -> Result<(), RuleError> {
        require(rule, !rule.header.is_empty(), "Header")
    }

    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        Self::validate(rule)?;
        Ok(Self {
            name: rule.name.clone(),
            header: rule.header.clone(),
            value: rule.value.clone(),
        })
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        headers.set(&self.header, &self.value)
    }
}

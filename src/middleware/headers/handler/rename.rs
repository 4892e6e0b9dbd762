use super::{compile, require, ApplyError, HeaderAccessor, Rule, RuleError};
use regex_lite::Regex;

/// `Rename`: 이름이 패턴과 일치하는 헤더를 `Value` 이름으로 옮깁니다.
///
/// 여러 값을 가진 헤더는 값이 모두 새 이름 아래로 누적됩니다.
#[derive(Debug, Clone)]
pub struct Renamer {
    pub(super) name: String,
    pattern: Regex,
    target: String,
}

impl Renamer {
    pub fn validate(rule: &Rule) -> Result<Regex, RuleError> {
        let pattern = compile(rule, &rule.header)?;
        require(rule, !rule.value.is_empty(), "Value")?;
        Ok(pattern)
    }

    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        let pattern = Self::validate(rule)?;
        Ok(Self {
            name: rule.name.clone(),
            pattern,
            target: rule.value.clone(),
        })
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        for (name, values) in headers.snapshot() {
            if !self.pattern.is_match(&name) {
                continue;
            }

            headers.delete(&name);
            for value in &values {
                headers.add(&self.target, value)?;
            }
        }
        Ok(())
    }
}

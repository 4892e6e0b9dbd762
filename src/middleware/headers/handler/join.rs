use super::{require, ApplyError, HeaderAccessor, Rule, RuleError};

/// `Join`: 대상 헤더의 현재 값 뒤에 `Sep` 과 각 값을 이어 붙입니다.
///
/// `HeaderPrefix` 로 시작하는 항목은 다른 헤더의 현재 값으로 치환됩니다.
/// 모든 항목은 대상 헤더를 덮어쓰기 전의 상태에서 읽습니다.
#[derive(Debug, Clone)]
pub struct Joiner {
    pub(super) name: String,
    header: String,
    values: Vec<String>,
    sep: String,
    prefix: String,
}

impl Joiner {
    pub fn validate(rule: &Rule) -> Result<(), RuleError> {
        require(rule, !rule.values.is_empty(), "Values")?;
        require(rule, !rule.sep.is_empty(), "Sep")
    }

    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        Self::validate(rule)?;
        Ok(Self {
            name: rule.name.clone(),
            header: rule.header.clone(),
            values: rule.values.clone(),
            sep: rule.sep.clone(),
            prefix: rule.header_prefix.clone(),
        })
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        if self.header.is_empty() || !headers.contains(&self.header) {
            return Ok(());
        }

        let mut joined = headers.get(&self.header);
        for entry in &self.values {
            joined.push_str(&self.sep);
            joined.push_str(&self.resolve(entry, &*headers));
        }

        headers.set(&self.header, &joined)
    }

    fn resolve(&self, entry: &str, headers: &dyn HeaderAccessor) -> String {
        if self.prefix.is_empty() {
            return entry.to_string();
        }

        match entry.strip_prefix(self.prefix.as_str()) {
            // 접두사만 있는 항목은 접두사 자체를 값으로 사용
            Some(name) if !name.is_empty() => headers.get(name),
            _ => entry.to_string(),
        }
    }
}

use super::{compile, require, ApplyError, HeaderAccessor, Rule, RuleError};
use regex_lite::{Captures, Regex};
use std::borrow::Cow;

/// `RewriteValueRule`: 이름이 일치하는 헤더의 각 값을 정규식 캡처로 다시 씁니다.
///
/// 값이 패턴과 일치하지 않으면 원래 값을 그대로 둡니다.
#[derive(Debug, Clone)]
pub struct Rewriter {
    pub(super) name: String,
    pattern: Regex,
    value_pattern: Regex,
    template: String,
}

impl Rewriter {
    pub fn validate(rule: &Rule) -> Result<(Regex, Regex), RuleError> {
        let pattern = compile(rule, &rule.header)?;
        require(rule, !rule.value_replace.is_empty(), "ValueReplace")?;
        let value_pattern = compile(rule, &rule.value)?;
        Ok((pattern, value_pattern))
    }

    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        let (pattern, value_pattern) = Self::validate(rule)?;
        Ok(Self {
            name: rule.name.clone(),
            pattern,
            value_pattern,
            template: rule.value_replace.clone(),
        })
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        for (name, values) in headers.snapshot() {
            if !self.pattern.is_match(&name) {
                continue;
            }

            headers.delete(&name);
            for value in &values {
                headers.add(&name, &self.replace(value))?;
            }
        }
        Ok(())
    }

    fn replace<'v>(&self, value: &'v str) -> Cow<'v, str> {
        let Some(captures) = self.value_pattern.captures(value) else {
            return Cow::Borrowed(value);
        };
        if captures.get(0).map_or(true, |m| m.as_str().is_empty()) {
            return Cow::Borrowed(value);
        }
        Cow::Owned(expand(&self.template, &captures))
    }
}

/// 템플릿의 `$N` 을 N 번째 캡처 그룹으로 바꿉니다.
///
/// 숫자가 이어지면 실제로 존재하는 그룹 번호 중 가장 긴 것을 사용합니다.
/// `$0` 이나 없는 그룹 번호는 그대로 남고, 매칭에 참여하지 않은 그룹은 빈 문자열이 됩니다.
fn expand(template: &str, captures: &Captures<'_>) -> String {
    let groups = captures.len().saturating_sub(1);
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        let group = (1..=digits).rev().find_map(|len| {
            after[..len]
                .parse::<usize>()
                .ok()
                .filter(|index| (1..=groups).contains(index))
                .map(|index| (index, len))
        });

        match group {
            Some((index, len)) => {
                out.push_str(captures.get(index).map_or("", |m| m.as_str()));
                rest = &after[len..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

//! 규칙 종류별 핸들러
//!
//! 각 핸들러는 생성 시점에 규칙을 검증하고, 적용 시점에는
//! [`HeaderAccessor`] 만을 통해 헤더를 읽고 씁니다.

mod delete;
mod join;
mod rename;
mod rewrite;
mod set;

pub use delete::Deleter;
pub use join::Joiner;
pub use rename::Renamer;
pub use rewrite::Rewriter;
pub use set::Setter;

use super::accessor::HeaderAccessor;
use super::error::{ApplyError, RuleError};
use super::rule::{Rule, RuleType};
use regex_lite::Regex;

/// 검증이 끝난 규칙 하나
#[derive(Debug, Clone)]
pub enum Handler {
    Set(Setter),
    Delete(Deleter),
    Rename(Renamer),
    Join(Joiner),
    Rewrite(Rewriter),
}

impl Handler {
    /// 규칙 종류에 맞는 핸들러를 만들고 검증합니다.
    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        let handler = match &rule.rule_type {
            RuleType::Set => Self::Set(Setter::new(rule)?),
            RuleType::Delete => Self::Delete(Deleter::new(rule)?),
            RuleType::Rename => Self::Rename(Renamer::new(rule)?),
            RuleType::Join => Self::Join(Joiner::new(rule)?),
            RuleType::RewriteValue => Self::Rewrite(Rewriter::new(rule)?),
            RuleType::Unknown(_) | RuleType::Empty => {
                return Err(RuleError::InvalidRuleType {
                    rule: rule.name.clone(),
                    kind: rule.rule_type.to_string(),
                })
            }
        };
        Ok(handler)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Set(h) => &h.name,
            Self::Delete(h) => &h.name,
            Self::Rename(h) => &h.name,
            Self::Join(h) => &h.name,
            Self::Rewrite(h) => &h.name,
        }
    }

    pub fn kind(&self) -> RuleType {
        match self {
            Self::Set(_) => RuleType::Set,
            Self::Delete(_) => RuleType::Delete,
            Self::Rename(_) => RuleType::Rename,
            Self::Join(_) => RuleType::Join,
            Self::Rewrite(_) => RuleType::RewriteValue,
        }
    }

    pub fn apply(&self, headers: &mut dyn HeaderAccessor) -> Result<(), ApplyError> {
        let result = match self {
            Self::Set(h) => h.apply(headers),
            Self::Delete(h) => {
                h.apply(headers);
                Ok(())
            }
            Self::Rename(h) => h.apply(headers),
            Self::Join(h) => h.apply(headers),
            Self::Rewrite(h) => h.apply(headers),
        };
        result.map_err(|e| e.in_rule(self.name()))
    }
}

fn compile(rule: &Rule, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRegexp {
        rule: rule.name.clone(),
        pattern: pattern.to_string(),
        source,
    })
}

fn require(rule: &Rule, present: bool, field: &'static str) -> Result<(), RuleError> {
    if present {
        Ok(())
    } else {
        Err(RuleError::MissingRequiredFields {
            rule: rule.name.clone(),
            field,
        })
    }
}

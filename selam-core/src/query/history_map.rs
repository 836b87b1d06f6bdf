//! Mapping from forecast series names to the historical indicator code
//! plotted underneath them.
//!
//! Resolution order: exact name entries, then `contains` rules in order,
//! then the default code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::codes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainsRule {
    pub pattern: String,
    pub code: String,
}

/// Which rule produced a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Contains(String),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalCodeMap {
    pub exact: BTreeMap<String, String>,
    pub contains: Vec<ContainsRule>,
    pub default_code: String,
}

impl Default for HistoricalCodeMap {
    fn default() -> Self {
        Self {
            exact: BTreeMap::new(),
            contains: vec![ContainsRule {
                pattern: "Access".to_string(),
                code: codes::ACC_OWNERSHIP.to_string(),
            }],
            default_code: codes::USG_DIGITAL_PAYMENT.to_string(),
        }
    }
}

impl HistoricalCodeMap {
    pub fn resolve(&self, name: &str) -> &str {
        self.resolve_with_rule(name).0
    }

    pub fn resolve_with_rule(&self, name: &str) -> (&str, MatchRule) {
        if let Some(code) = self.exact.get(name) {
            return (code.as_str(), MatchRule::Exact);
        }
        if let Some(rule) = self.contains.iter().find(|r| name.contains(r.pattern.as_str())) {
            return (rule.code.as_str(), MatchRule::Contains(rule.pattern.clone()));
        }
        (self.default_code.as_str(), MatchRule::Default)
    }

    /// Historical codes that more than one of `names` maps to through a
    /// `contains` rule, with the names involved.
    pub fn shared_contains_targets<'n>(&self, names: &'n [String]) -> BTreeMap<&str, Vec<&'n str>> {
        let mut by_code: BTreeMap<&str, Vec<&'n str>> = BTreeMap::new();
        for name in names {
            if let (code, MatchRule::Contains(_)) = self.resolve_with_rule(name) {
                by_code.entry(code).or_default().push(name.as_str());
            }
        }
        by_code.retain(|_, v| v.len() > 1);
        by_code
    }
}

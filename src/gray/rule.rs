//! Gray rule types and rule text parsing.
//!
//! # Rule Format
//! ```text
//! type[;item[;item...]]
//!
//! type: allow | deny          (case-insensitive)
//! item: literal id | %N       (N a positive integer)
//! ```
//!
//! # Semantics
//! - `allow`: everyone passes except listed ids and ids in any `%N` bucket
//! - `deny`: nobody passes except listed ids and ids in any `%N` bucket
//! - Buckets are OR-ed; `%2;%3` selects ids divisible by 2 or by 3

use std::collections::HashSet;
use std::fmt;

use crate::gray::identifier::GrayId;

/// Default outcome of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    Allow,
    Deny,
}

impl RuleType {
    /// Parse a rule type token, ignoring ASCII case.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("allow") {
            Some(RuleType::Allow)
        } else if token.eq_ignore_ascii_case("deny") {
            Some(RuleType::Deny)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Allow => "allow",
            RuleType::Deny => "deny",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed gray rule. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRule {
    /// Full config name (`namespace.key`) the rule was read from.
    pub config_name: String,
    pub rule_type: RuleType,
    /// Exception ids. `None` when the rule lists none.
    pub name_set: Option<HashSet<String>>,
    /// Positive bucket divisors. `None` when the rule lists none.
    pub percent_set: Option<HashSet<i64>>,
}

impl GrayRule {
    /// Parse raw rule text stored under `config_name`.
    ///
    /// Returns `None` for empty text or an unknown rule type. Malformed
    /// `%N` items are dropped individually.
    pub fn parse(config_name: impl Into<String>, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (type_token, rest) = match raw.split_once(';') {
            Some((head, tail)) => (head, Some(tail)),
            None => (raw, None),
        };
        let rule_type = RuleType::parse(type_token.trim())?;

        let mut name_set = HashSet::new();
        let mut percent_set = HashSet::new();
        for item in rest.map(str::trim).unwrap_or_default().split(';') {
            if item.is_empty() {
                continue;
            }
            match item.strip_prefix('%') {
                Some(divisor) => match divisor.parse::<i64>() {
                    Ok(n) if n > 0 => {
                        percent_set.insert(n);
                    }
                    _ => tracing::debug!(item, "Dropping invalid percent item"),
                },
                None => {
                    name_set.insert(item.to_string());
                }
            }
        }

        Some(Self {
            config_name: config_name.into(),
            rule_type,
            name_set: (!name_set.is_empty()).then_some(name_set),
            percent_set: (!percent_set.is_empty()).then_some(percent_set),
        })
    }

    /// Evaluate `id` against this rule.
    pub fn allows<I: GrayId + ?Sized>(&self, id: &I) -> bool {
        let default = self.rule_type == RuleType::Allow;
        if self.matches(id) {
            !default
        } else {
            default
        }
    }

    /// Whether `id` is listed or falls into any bucket.
    fn matches<I: GrayId + ?Sized>(&self, id: &I) -> bool {
        if let Some(names) = &self.name_set {
            if names.contains(id.membership_key().as_ref()) {
                return true;
            }
        }
        if let Some(percents) = &self.percent_set {
            let bucket = id.bucket_key();
            return percents.iter().any(|p| bucket % p == 0);
        }
        false
    }
}

/// Fail-closed evaluation: no rule means deny.
pub fn is_allowed<I: GrayId + ?Sized>(rule: Option<&GrayRule>, id: &I) -> bool {
    rule.is_some_and(|r| r.allows(id))
}

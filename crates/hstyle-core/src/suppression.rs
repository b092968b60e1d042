//! Comment-based suppression directives.
//!
//! Supports directives like:
//! ```text
//! -- hstyle: allow(line-length) reason="generated table"
//! ```
//!
//! A directive silences the listed rule ids on its own line and on the line
//! after it. `all` silences every rule.

use crate::span::{Span, SpanKind};
use crate::types::Violation;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule ids that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn allows(&self, rule_id: &str) -> bool {
        self.rules.contains(rule_id) || self.rules.contains("all")
    }
}

/// Allow directives of one document, indexed by line.
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    by_line: HashMap<usize, AllowDirective>,
}

impl Suppressions {
    /// Collects directives from the line comments among `spans`.
    #[must_use]
    pub fn from_spans(spans: &[Span]) -> Self {
        let by_line = spans
            .iter()
            .filter(|s| s.kind == SpanKind::LineComment)
            .filter_map(|s| parse_allow_directive(&s.text).map(|d| (s.start.line, d)))
            .collect();
        Self { by_line }
    }

    /// Returns true if no directives were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Checks whether `rule_id` is allowed on `line`.
    #[must_use]
    pub fn check(&self, line: usize, rule_id: &str) -> AllowCheck {
        for check_line in [line.saturating_sub(1), line] {
            if let Some(directive) = self.by_line.get(&check_line) {
                if directive.allows(rule_id) {
                    return AllowCheck::Allowed {
                        reason: directive.reason.clone(),
                    };
                }
            }
        }
        AllowCheck::Denied
    }

    /// Drops the violations silenced by a directive.
    #[must_use]
    pub fn apply(&self, violations: Vec<Violation>) -> Vec<Violation> {
        if self.is_empty() {
            return violations;
        }
        violations
            .into_iter()
            .filter(|v| {
                let check = self.check(v.line, &v.rule_id);
                if check.is_allowed() {
                    debug!(
                        "Suppressed {} at {}:{} ({})",
                        v.rule_id,
                        v.line,
                        v.column,
                        check.reason().unwrap_or("no reason given")
                    );
                }
                !check.is_allowed()
            })
            .collect()
    }
}

/// Parses an allow directive from the text of a line comment.
#[must_use]
pub fn parse_allow_directive(comment: &str) -> Option<AllowDirective> {
    let content = comment.trim_start_matches('-').trim();

    let directive = content.strip_prefix("hstyle:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::types::Severity;

    #[test]
    fn parses_directive() {
        let directive = parse_allow_directive("-- hstyle: allow(line-length)").unwrap();
        assert!(directive.rules.contains("line-length"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn parses_directive_with_reason_and_several_rules() {
        let directive =
            parse_allow_directive("-- hstyle: allow(tabs, naming) reason=\"vendored code\"")
                .unwrap();
        assert!(directive.rules.contains("tabs"));
        assert!(directive.rules.contains("naming"));
        assert_eq!(directive.reason.as_deref(), Some("vendored code"));
    }

    #[test]
    fn ignores_other_comments() {
        assert!(parse_allow_directive("-- allow(line-length)").is_none());
        assert!(parse_allow_directive("-- hstyle: allow()").is_none());
    }

    #[test]
    fn applies_to_same_and_next_line() {
        let text = "-- hstyle: allow(line-length) reason=\"table\"\nx = 1\ny = 2 -- hstyle: allow(all)\nz = 3\nw = 4\n";
        let suppressions = Suppressions::from_spans(&scan(text).spans);

        let check = suppressions.check(2, "line-length");
        assert!(check.is_allowed());
        assert_eq!(check.reason(), Some("table"));
        assert!(!suppressions.check(2, "tabs").is_allowed());
        assert!(suppressions.check(3, "tabs").is_allowed());
        assert!(suppressions.check(4, "tabs").is_allowed());
        assert!(!suppressions.check(5, "tabs").is_allowed());
    }

    #[test]
    fn directives_inside_strings_are_ignored() {
        let text = "s = \"-- hstyle: allow(all)\"\n";
        assert!(Suppressions::from_spans(&scan(text).spans).is_empty());
    }

    #[test]
    fn apply_filters_violations() {
        let text = "x = 1 -- hstyle: allow(tabs)\n";
        let suppressions = Suppressions::from_spans(&scan(text).spans);
        let violations = vec![
            Violation::new("tabs", Severity::Error, (1, 1), (1, 2), "tab"),
            Violation::new("line-length", Severity::Error, (1, 1), (1, 2), "long"),
        ];
        let kept = suppressions.apply(violations);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rule_id, "line-length");
    }
}

//! Rule trait for defining style rules.

use crate::context::{BlockContext, DocumentContext, Finding, LineContext, TokenContext};

/// Dimension a rule family is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    /// Once per physical line.
    Line,
    /// Once per token.
    Token,
    /// Once per layout block, pre-order.
    Block,
    /// Once per document.
    Document,
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Token => write!(f, "token"),
            Self::Block => write!(f, "block"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// A style rule family instance.
///
/// Implementations override the `check_*` method matching the scope of
/// their family; the others keep the empty default. Rules never fail: a
/// situation the rule cannot decide yields no finding.
///
/// # Example
///
/// ```ignore
/// use hstyle_core::{Finding, LineContext, Rule};
///
/// pub struct NoTabs;
///
/// impl Rule for NoTabs {
///     fn family(&self) -> &'static str { "no-tabs" }
///
///     fn check_line(&self, ctx: &LineContext) -> Vec<Finding> {
///         ctx.line.text.chars().enumerate()
///             .filter(|(_, c)| *c == '\t')
///             .map(|(i, _)| Finding::on_line(ctx.line.number, i + 1, 1, "tab character"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case family name (e.g., "max-line-length").
    fn family(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Checks one physical line.
    fn check_line(&self, _ctx: &LineContext<'_>) -> Vec<Finding> {
        Vec::new()
    }

    /// Checks one token.
    fn check_token(&self, _ctx: &TokenContext<'_>) -> Vec<Finding> {
        Vec::new()
    }

    /// Checks one layout block.
    fn check_block(&self, _ctx: &BlockContext<'_>) -> Vec<Finding> {
        Vec::new()
    }

    /// Checks the whole document.
    fn check_document(&self, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        Vec::new()
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn family(&self) -> &'static str {
            "test-rule"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
    }

    #[test]
    fn default_checks_find_nothing() {
        let rule: RuleBox = Box::new(TestRule);
        assert_eq!(rule.family(), "test-rule");
        assert_eq!(rule.description(), "A test rule");
        assert_eq!(RuleScope::Document.to_string(), "document");
    }
}

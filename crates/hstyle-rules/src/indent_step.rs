//! Rule fixing the indentation step between nested layout blocks.
//!
//! # Detected Patterns
//!
//! A block whose first token starts a line of its own must be indented
//! exactly `k` columns past its parent's anchor:
//!
//! ```text
//! data Point = Point
//!   { px :: Int        -- record anchor 3, parent anchor 1: step 2
//!   }
//! ```
//!
//! # Exceptions
//!
//! Blocks of a kind listed in `exceptions` that open inside a binding
//! (`main = do`, `x <- case ...`) may use `exception_step` instead, so the
//! common four-column `do` body passes a two-column rule.
//!
//! Inline blocks (`let x = 1` on the opener's line), the module root and
//! import groups are never checked.

use hstyle_core::{BlockContext, Finding, LayoutKind, Rule};

/// Family name for indent-step.
pub const FAMILY: &str = "indent-step";

/// Checks block anchor steps.
#[derive(Debug, Clone)]
pub struct IndentStep {
    /// Required step.
    pub k: usize,
    /// Alternative step for exception blocks inside a binding.
    pub exception_step: usize,
    /// Kinds allowed to use `exception_step`.
    pub exceptions: Vec<LayoutKind>,
}

impl Default for IndentStep {
    fn default() -> Self {
        Self::new(2)
    }
}

impl IndentStep {
    /// Creates the rule with step `k` and the usual `do`/`case`/`let`
    /// exceptions at four columns.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            exception_step: 4,
            exceptions: vec![LayoutKind::Do, LayoutKind::Case, LayoutKind::Let],
        }
    }

    /// Sets the exception step.
    #[must_use]
    pub fn exception_step(mut self, step: usize) -> Self {
        self.exception_step = step;
        self
    }

    /// Sets the exception kinds.
    #[must_use]
    pub fn exceptions(mut self, kinds: Vec<LayoutKind>) -> Self {
        self.exceptions = kinds;
        self
    }
}

impl Rule for IndentStep {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires a fixed indentation step between nested blocks"
    }

    fn check_block(&self, ctx: &BlockContext<'_>) -> Vec<Finding> {
        let block = ctx.block;
        let Some(parent) = ctx.parent else {
            return Vec::new();
        };
        if block.inline || block.kind == LayoutKind::ImportGroup {
            return Vec::new();
        }

        let Some(step) = block.anchor_column.checked_sub(parent.anchor_column) else {
            return vec![Finding::on_line(
                block.start_line,
                block.anchor_column,
                1,
                format!(
                    "{} block at column {} is left of its parent at column {}",
                    block.kind, block.anchor_column, parent.anchor_column
                ),
            )];
        };

        if step == self.k {
            return Vec::new();
        }
        let excepted = block.in_binding && self.exceptions.contains(&block.kind);
        if excepted && step == self.exception_step {
            return Vec::new();
        }

        let expected = if excepted {
            format!("{} or {}", self.k, self.exception_step)
        } else {
            self.k.to_string()
        };
        vec![Finding::on_line(
            block.start_line,
            block.anchor_column,
            1,
            format!(
                "{} block is indented {step} columns past its parent, expected {expected}",
                block.kind
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::check;

    const RULE: &str = r#"
[[rules]]
id = "indent"
check = "indent-step"
k = 2
"#;

    #[test]
    fn test_do_block_may_use_exception_step() {
        assert!(check("main = do\n    print 1\n    print 2\n", RULE).is_empty());
        assert!(check("main = do\n  print 1\n", RULE).is_empty());
    }

    #[test]
    fn test_record_with_wide_step_fails() {
        let violations = check("data P = P\n    { px :: Int\n    }\n", RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (2, 5));
        assert_eq!(
            violations[0].message,
            "record block is indented 4 columns past its parent, expected 2"
        );
    }

    #[test]
    fn test_odd_step_in_do_reports_both_choices() {
        let violations = check("main = do\n   print 1\n", RULE);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with("expected 2 or 4"));
    }

    #[test]
    fn test_inline_blocks_are_skipped() {
        assert!(check("f = let x = 1\n        y = 2\n    in x + y\n", RULE).is_empty());
    }

    #[test]
    fn test_exception_requires_binding() {
        let rule = r#"
[[rules]]
id = "indent"
check = "indent-step"
k = 2
exceptions = ["where"]
"#;
        let violations = check("main = go\n  where\n    go = pure ()\n", rule);
        assert!(violations.is_empty(), "{violations:?}");

        let violations = check("class C a where\n    m :: a\n", rule);
        assert_eq!(violations.len(), 1);
    }
}

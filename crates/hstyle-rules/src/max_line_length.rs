//! Rule limiting the display width of physical lines.
//!
//! # Rationale
//!
//! A line is one display line no matter how many span kinds it crosses, so
//! a line that is half code and half trailing comment is measured whole and
//! reported at most once. A rule that sees any part of an overlong line
//! reports it, even when the overflow itself lies in a kind it does not
//! declare.
//!
//! # Configuration
//!
//! - `n`: maximum number of characters (default 80), excluding the line
//!   terminator

use hstyle_core::{Finding, LineContext, Rule};

/// Family name for max-line-length.
pub const FAMILY: &str = "max-line-length";

/// Flags lines longer than `n` characters.
#[derive(Debug, Clone)]
pub struct MaxLineLength {
    /// Maximum width.
    pub n: usize,
}

impl Default for MaxLineLength {
    fn default() -> Self {
        Self::new(80)
    }
}

impl MaxLineLength {
    /// Creates the rule with the given limit.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Rule for MaxLineLength {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Limits the number of characters on a line"
    }

    fn check_line(&self, ctx: &LineContext<'_>) -> Vec<Finding> {
        let width = ctx.line.width();
        if width <= self.n {
            return Vec::new();
        }

        // Report from the first overflowing column the rule can see, else
        // from the start of the last segment it can see.
        let column = (self.n + 1..=width)
            .find(|&c| ctx.is_visible(c))
            .or_else(|| {
                ctx.segments
                    .iter()
                    .rev()
                    .find(|s| !s.is_empty())
                    .map(|s| s.start_column)
            });
        let Some(column) = column else {
            return Vec::new();
        };

        vec![Finding::on_line(
            ctx.line.number,
            column,
            width + 1 - column,
            format!("line is {width} characters long, limit is {}", self.n),
        )]
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::check;

    const RULE: &str = "[[rules]]\nid = \"line-length\"\ncheck = \"max-line-length\"\nn = 10\n";

    #[test]
    fn test_flags_long_line_once() {
        let violations = check("short = 1\nlonger = \"abc\" -- note\n", RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (2, 11));
        assert_eq!(violations[0].end_column, 23);
        assert_eq!(violations[0].message, "line is 22 characters long, limit is 10");
    }

    #[test]
    fn test_exact_limit_passes() {
        assert!(check("abcde = 12\n", RULE).is_empty());
    }

    #[test]
    fn test_carriage_return_not_counted() {
        assert!(check("abcde = 12\r\n", RULE).is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(check("s = \"äöü\"\n", RULE).is_empty());
    }

    #[test]
    fn test_string_only_rule_reports_inside_string() {
        let rule = "[[rules]]\nid = \"long-strings\"\ncheck = \"max-line-length\"\nn = 10\napplies-to = [\"string-literal\"]\n";
        let violations = check("x = \"aaaaaaaaaaaa\"\n", rule);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column, 11);

        // Overflow lies in code; the string segment still carries the finding.
        let violations = check("x = \"a\" + somethingLong\n", rule);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].column, violations[0].end_column), (5, 24));
    }

    #[test]
    fn test_code_only_rule_reports_line_with_long_trailing_comment() {
        let rule = "[[rules]]\nid = \"line-length-strict\"\ncheck = \"max-line-length\"\nn = 20\napplies-to = [\"code\"]\n";
        let text = "x = 1  -- a trailing comment that goes far past twenty characters\n";
        let violations = check(text, rule);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column, 1);
        assert_eq!(violations[0].message, "line is 65 characters long, limit is 20");
    }

    #[test]
    fn test_line_without_declared_kinds_is_not_reported() {
        let rule = "[[rules]]\nid = \"line-length-strict\"\ncheck = \"max-line-length\"\nn = 10\napplies-to = [\"code\"]\n";
        assert!(check("{- a block comment well past ten -}\n", rule).is_empty());
    }
}

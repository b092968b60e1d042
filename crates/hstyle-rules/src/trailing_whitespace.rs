//! Rule forbidding spaces and tabs at the end of a line.
//!
//! Applies inside every declared span kind, multi-line string literals
//! included: trailing whitespace there still shows up as diff noise.

use hstyle_core::{Finding, LineContext, Rule};

/// Family name for no-trailing-whitespace.
pub const FAMILY: &str = "no-trailing-whitespace";

/// Flags trailing spaces and tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrailingWhitespace;

impl NoTrailingWhitespace {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTrailingWhitespace {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Forbids trailing spaces and tabs"
    }

    fn check_line(&self, ctx: &LineContext<'_>) -> Vec<Finding> {
        let width = ctx.line.width();
        let trailing = ctx
            .line
            .text
            .chars()
            .rev()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count();
        if trailing == 0 {
            return Vec::new();
        }

        let first = width - trailing + 1;
        let Some(column) = (first..=width).find(|&c| ctx.is_visible(c)) else {
            return Vec::new();
        };

        vec![Finding::on_line(
            ctx.line.number,
            column,
            width + 1 - column,
            "trailing whitespace",
        )]
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::check;

    const RULE: &str = "[[rules]]\nid = \"trailing-whitespace\"\ncheck = \"no-trailing-whitespace\"\n";

    #[test]
    fn test_reports_first_trailing_column() {
        let violations = check("foo = 1 \n", RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (1, 8));
        assert_eq!(violations[0].end_column, 9);
    }

    #[test]
    fn test_tabs_and_whitespace_only_lines() {
        let violations = check("a = 1\t \n  \nb = 2\n", RULE);
        let positions: Vec<(usize, usize)> =
            violations.iter().map(|v| (v.line, v.column)).collect();
        assert_eq!(positions, vec![(1, 6), (2, 1)]);
    }

    #[test]
    fn test_inside_multiline_string_gap() {
        let violations = check("s = \"one\\  \n    \\two\"\n", RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (1, 10));
    }

    #[test]
    fn test_clean_lines_pass() {
        assert!(check("x = 1\r\ny = 2\n", RULE).is_empty());
    }
}

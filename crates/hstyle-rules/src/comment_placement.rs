//! Rule requiring a gap between code and an end-of-line comment.
//!
//! ```text
//! x = 1 -- one space: reported with the default gap of 2
//! y = 2  -- fine
//! ```

use hstyle_core::{DocumentContext, Finding, Rule};

/// Family name for comment-placement.
pub const FAMILY: &str = "comment-placement";

/// Checks the gap before end-of-line comments.
#[derive(Debug, Clone)]
pub struct CommentPlacement {
    /// Minimum number of whitespace characters before the comment.
    pub min_gap: usize,
}

impl Default for CommentPlacement {
    fn default() -> Self {
        Self::new(2)
    }
}

impl CommentPlacement {
    /// Creates the rule.
    #[must_use]
    pub fn new(min_gap: usize) -> Self {
        Self { min_gap }
    }
}

impl Rule for CommentPlacement {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires end-of-line comments to be separated from code"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for span in ctx.spans().filter(|s| s.kind.is_comment()) {
            let Some(line) = ctx.lines.get(span.start.line) else {
                continue;
            };
            let before: Vec<char> = line.text.chars().take(span.start.column - 1).collect();
            let gap = before.iter().rev().take_while(|c| c.is_whitespace()).count();
            if gap == before.len() {
                // Nothing but indentation before the comment.
                continue;
            }

            let ends_line = ctx
                .lines
                .get(span.end.line)
                .is_some_and(|end| end.text.chars().skip(span.end.column - 1).all(char::is_whitespace));
            if !ends_line {
                continue;
            }

            if gap < self.min_gap {
                findings.push(Finding::on_line(
                    span.start.line,
                    span.start.column,
                    2,
                    format!(
                        "end-of-line comment needs at least {} spaces before it, found {gap}",
                        self.min_gap
                    ),
                ));
            }
        }

        findings
    }
}

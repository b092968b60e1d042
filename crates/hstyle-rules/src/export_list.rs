//! Rule checking the layout of the module export list.
//!
//! # Detected Patterns
//!
//! - An export item starting on a new line must start in the same column
//!   as the first item.
//! - A Haddock section marker (`-- * Parsing`) inside the export list must
//!   sit on a line of its own.
//!
//! ```text
//! module Parser
//!     ( -- * Parsing
//!       parse
//!     , parseFile      -- reported: not aligned with `parse`
//!     ) where
//! ```

use hstyle_core::scanner::{Token, TokenKind};
use hstyle_core::{DocumentContext, Finding, Rule, SpanKind};

/// Family name for export-list-structure.
pub const FAMILY: &str = "export-list-structure";

/// Checks export list alignment and section markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportListStructure;

impl ExportListStructure {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// The tokens between the export list parentheses, and the parentheses.
struct ExportList<'a> {
    open: &'a Token,
    close: &'a Token,
    /// First token of every item, in order.
    items: Vec<&'a Token>,
    /// All tokens inside the parentheses.
    inner: &'a [Token],
}

fn export_list(tokens: &[Token]) -> Option<ExportList<'_>> {
    if !tokens.first()?.is_keyword("module") {
        return None;
    }
    // `module`, then the module name, then the list.
    let open_index = 2;
    let open = tokens.get(open_index)?;
    if !open.is_punct("(") {
        return None;
    }

    let mut depth = 0usize;
    let mut items = Vec::new();
    let mut expect_item = true;
    for (offset, token) in tokens[open_index + 1..].iter().enumerate() {
        let punct = token.kind == TokenKind::Punctuation;
        match token.text.as_str() {
            "(" | "[" | "{" if punct => depth += 1,
            ")" | "]" | "}" if punct => {
                if depth == 0 {
                    let close_index = open_index + 1 + offset;
                    return Some(ExportList {
                        open,
                        close: token,
                        items,
                        inner: &tokens[open_index + 1..close_index],
                    });
                }
                depth -= 1;
                continue;
            }
            "," if punct && depth == 0 => {
                expect_item = true;
                continue;
            }
            _ => {}
        }
        if expect_item {
            items.push(token);
            expect_item = false;
        }
    }
    None
}

impl Rule for ExportListStructure {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires an aligned export list with standalone section markers"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(list) = export_list(ctx.tokens()) else {
            return Vec::new();
        };
        let mut findings = Vec::new();

        if let Some((first, rest)) = list.items.split_first() {
            let mut previous_line = first.start.line;
            for item in rest {
                if item.start.line != previous_line && item.start.column != first.start.column {
                    findings.push(Finding::at_token(
                        item,
                        format!(
                            "export `{}` starts at column {}, expected column {}",
                            item.text, item.start.column, first.start.column
                        ),
                    ));
                }
                previous_line = item.start.line;
            }
        }

        let markers = ctx.spans().filter(|s| {
            s.kind == SpanKind::HaddockComment
                && s.start > list.open.start
                && s.start < list.close.start
                && s.text.trim_start_matches('-').trim_start().starts_with('*')
        });
        for marker in markers {
            let shares_line = list
                .inner
                .iter()
                .any(|t| t.start.line == marker.start.line || t.end.line == marker.start.line);
            if shares_line {
                findings.push(Finding::between(
                    marker.start,
                    marker.end,
                    "section marker must be on a line of its own",
                ));
            }
        }

        findings
    }
}

//! Rule requiring Haddock documentation on top-level declarations.
//!
//! Every module-level type signature and `data`, `newtype`, `class` or
//! `type` declaration must be directly preceded by a Haddock comment
//! (`-- |`). Plain comment lines continuing the Haddock block and pragmas
//! between the comment and the declaration are allowed.
//!
//! Not part of the default catalogue.

use hstyle_core::layout::LayoutItem;
use hstyle_core::scanner::{Token, TokenKind};
use hstyle_core::{DocumentContext, Finding, Rule, Span, SpanKind};

/// Family name for haddock-presence.
pub const FAMILY: &str = "haddock-presence";

const DOCUMENTED_KEYWORDS: &[&str] = &["data", "newtype", "class", "type"];

/// Checks for Haddock comments on top-level declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaddockPresence;

impl HaddockPresence {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Whether a root item needs documentation.
fn needs_docs(tokens: &[Token], item: &LayoutItem) -> bool {
    let Some(head) = tokens.get(item.first_token) else {
        return false;
    };
    if DOCUMENTED_KEYWORDS.iter().any(|k| head.is_keyword(k)) {
        // `type instance` and `data instance` document the family instead.
        return !tokens
            .get(item.first_token + 1)
            .is_some_and(|t| t.is_keyword("instance"));
    }
    if !matches!(head.kind, TokenKind::Identifier(_)) && !head.is_punct("(") {
        return false;
    }

    // A type signature: names up to `::` on the item's first line.
    tokens[item.first_token..]
        .iter()
        .take_while(|t| t.start.line == item.start_line)
        .find(|t| {
            !matches!(t.kind, TokenKind::Identifier(_))
                && !t.is_punct("(")
                && !t.is_punct(")")
                && !t.is_punct(",")
        })
        .is_some_and(|t| t.is_op("::"))
}

/// Whether the visible spans directly before `head` end in a Haddock comment.
fn is_documented(spans: &[&Span], head: &Token) -> bool {
    let before = spans.iter().rev().skip_while(|s| s.start >= head.start);

    for span in before {
        match span.kind {
            SpanKind::HaddockComment => {
                return span
                    .text
                    .trim_start_matches(['-', '{'])
                    .trim_start()
                    .starts_with('|');
            }
            SpanKind::Pragma | SpanKind::LineComment => {}
            SpanKind::Code => {
                let code = if span.end > head.start {
                    let len = head.start.offset - span.start.offset;
                    span.text.get(..len).unwrap_or("")
                } else {
                    span.text.as_str()
                };
                if !code.trim().is_empty() {
                    return false;
                }
            }
            _ => return false,
        }
    }
    false
}

impl Rule for HaddockPresence {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires Haddock comments on top-level signatures and type declarations"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let tokens = ctx.tokens();
        let spans: Vec<&Span> = ctx.spans().collect();

        ctx.layout
            .tree
            .root()
            .items
            .iter()
            .filter(|item| needs_docs(tokens, item))
            .filter_map(|item| tokens.get(item.first_token))
            .filter(|head| !is_documented(&spans, head))
            .map(|head| Finding::at_token(head, "missing Haddock comment"))
            .collect()
    }
}

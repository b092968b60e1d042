//! Context types for rule execution.

use crate::layout::{Layout, LayoutBlock};
use crate::lines::{LineSegment, SourceLine, SourceLines};
use crate::scanner::Token;
use crate::span::{Pos, Span, SpanKind};

/// Everything known about one document, shared by all rules.
///
/// `kinds` holds the span kinds declared by the rule currently being
/// evaluated; accessors filter by it.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    /// Full document text.
    pub text: &'a str,
    /// Classified spans in document order.
    pub spans: &'a [Span],
    /// Physical lines.
    pub lines: &'a SourceLines,
    /// Layout tree and tokens.
    pub layout: &'a Layout,
    /// Span kinds declared by the current rule.
    pub kinds: &'a [SpanKind],
}

impl<'a> DocumentContext<'a> {
    /// Creates a context that declares no span kinds.
    #[must_use]
    pub fn new(text: &'a str, spans: &'a [Span], lines: &'a SourceLines, layout: &'a Layout) -> Self {
        Self {
            text,
            spans,
            lines,
            layout,
            kinds: &[],
        }
    }

    /// Returns a copy restricted to `kinds`.
    #[must_use]
    pub fn with_kinds(self, kinds: &'a [SpanKind]) -> Self {
        Self { kinds, ..self }
    }

    /// Spans of the declared kinds.
    pub fn spans(&self) -> impl Iterator<Item = &'a Span> + '_ {
        self.spans.iter().filter(|s| self.kinds.contains(&s.kind))
    }

    /// Tokens, or an empty slice when `code` is not declared.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        if self.kinds.contains(&SpanKind::Code) {
            &self.layout.tokens
        } else {
            &[]
        }
    }
}

/// Context for line rules: one physical line and its visible segments.
#[derive(Debug, Clone)]
pub struct LineContext<'a> {
    /// The document.
    pub doc: DocumentContext<'a>,
    /// The line being checked.
    pub line: &'a SourceLine,
    /// Kind of the span the line starts in.
    pub kind: Option<SpanKind>,
    /// Innermost layout block whose line range contains the line.
    pub block: &'a LayoutBlock,
    /// Segments of the line whose kind the rule declares.
    pub segments: Vec<&'a LineSegment>,
}

impl LineContext<'_> {
    /// Returns true if `column` lies in a visible segment.
    #[must_use]
    pub fn is_visible(&self, column: usize) -> bool {
        self.segments.iter().any(|s| s.contains(column))
    }
}

/// Context for token rules.
#[derive(Debug, Clone)]
pub struct TokenContext<'a> {
    /// The document.
    pub doc: DocumentContext<'a>,
    /// Index of the token in the layout's token list.
    pub index: usize,
    /// The token being checked.
    pub token: &'a Token,
    /// Innermost layout block containing the token.
    pub block: &'a LayoutBlock,
    /// First token of the enclosing layout item.
    pub item_head: Option<&'a Token>,
}

impl<'a> TokenContext<'a> {
    /// Token at a relative offset from the current one.
    #[must_use]
    pub fn neighbour(&self, delta: isize) -> Option<&'a Token> {
        self.index
            .checked_add_signed(delta)
            .and_then(|i| self.doc.layout.tokens.get(i))
    }
}

/// Context for block rules.
#[derive(Debug, Clone)]
pub struct BlockContext<'a> {
    /// The document.
    pub doc: DocumentContext<'a>,
    /// The block being checked.
    pub block: &'a LayoutBlock,
    /// Its parent, `None` for the root.
    pub parent: Option<&'a LayoutBlock>,
}

/// A positioned finding produced by a rule, before the evaluator stamps it
/// with the rule id and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Start (line, column).
    pub start: (usize, usize),
    /// End (line, column), exclusive.
    pub end: (usize, usize),
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Creates a finding spanning `start..end`.
    #[must_use]
    pub fn new(start: (usize, usize), end: (usize, usize), message: impl Into<String>) -> Self {
        Self {
            start,
            end,
            message: message.into(),
        }
    }

    /// A finding covering `width` characters of one line.
    #[must_use]
    pub fn on_line(line: usize, column: usize, width: usize, message: impl Into<String>) -> Self {
        Self::new((line, column), (line, column + width), message)
    }

    /// A finding covering a token.
    #[must_use]
    pub fn at_token(token: &Token, message: impl Into<String>) -> Self {
        Self::between(token.start, token.end, message)
    }

    /// A finding covering `start..end`.
    #[must_use]
    pub fn between(start: Pos, end: Pos, message: impl Into<String>) -> Self {
        Self::new((start.line, start.column), (end.line, end.column), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_layout;
    use crate::scanner::scan;

    #[test]
    fn tokens_require_code_kind() {
        let text = "x = \"s\" -- c\n";
        let spans = scan(text).spans;
        let lines = SourceLines::new(text, &spans);
        let layout = build_layout(&spans);
        let doc = DocumentContext::new(text, &spans, &lines, &layout);

        let comments = doc.with_kinds(&[SpanKind::LineComment]);
        assert!(comments.tokens().is_empty());
        assert_eq!(comments.spans().count(), 1);

        let code = doc.with_kinds(&[SpanKind::Code]);
        assert_eq!(code.tokens().len(), 3);
    }

    #[test]
    fn finding_positions() {
        let f = Finding::on_line(3, 5, 2, "m");
        assert_eq!((f.start, f.end), ((3, 5), (3, 7)));
    }
}

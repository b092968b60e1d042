//! Source positions and classified spans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Byte offset from the start of the input (0-based).
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, counted in characters).
    pub column: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The very beginning of a document.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 1, 1)
    }

    /// Returns the position after consuming `c`.
    #[must_use]
    pub fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self::new(self.offset + 1, self.line + 1, 1)
        } else {
            Self::new(self.offset + c.len_utf8(), self.line, self.column + 1)
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexical classification of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanKind {
    /// Ordinary code, including whitespace between other spans.
    Code,
    /// `-- ...` up to the end of the line.
    LineComment,
    /// `{- ... -}`, possibly nested.
    BlockComment,
    /// `"..."`, possibly spanning lines through string gaps.
    StringLiteral,
    /// `'x'`.
    CharLiteral,
    /// `{-# ... #-}`.
    Pragma,
    /// A line or block comment starting with `|`, `^`, `*` or `$`.
    HaddockComment,
}

impl SpanKind {
    /// All span kinds, in declaration order.
    pub const ALL: [SpanKind; 7] = [
        Self::Code,
        Self::LineComment,
        Self::BlockComment,
        Self::StringLiteral,
        Self::CharLiteral,
        Self::Pragma,
        Self::HaddockComment,
    ];

    /// Returns the kebab-case name used in catalogue files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::LineComment => "line-comment",
            Self::BlockComment => "block-comment",
            Self::StringLiteral => "string-literal",
            Self::CharLiteral => "char-literal",
            Self::Pragma => "pragma",
            Self::HaddockComment => "haddock-comment",
        }
    }

    /// Looks up a span kind by its kebab-case name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Returns true for the comment kinds (line, block, Haddock).
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::HaddockComment
        )
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, position-tagged contiguous range of source text.
///
/// `end` is exclusive: it is the position just after the last character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Lexical classification.
    pub kind: SpanKind,
    /// First character of the span.
    pub start: Pos,
    /// Position just past the last character.
    pub end: Pos,
    /// The covered text, verbatim.
    pub text: String,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(kind: SpanKind, start: Pos, end: Pos, text: impl Into<String>) -> Self {
        Self {
            kind,
            start,
            end,
            text: text.into(),
        }
    }

    /// Returns true if `pos` lies within the span.
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.start.offset <= pos.offset && pos.offset < self.end.offset
    }

    /// Returns the last line that holds at least one character of the span
    /// other than a terminating newline.
    #[must_use]
    pub fn last_line(&self) -> usize {
        if self.end.column == 1 && self.end.line > self.start.line {
            self.end.line - 1
        } else {
            self.end.line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let pos = Pos::origin().advance('a').advance('λ');
        assert_eq!(pos, Pos::new(3, 1, 3));
        let pos = pos.advance('\n');
        assert_eq!(pos, Pos::new(4, 2, 1));
    }

    #[test]
    fn span_kind_names_round_trip() {
        for kind in SpanKind::ALL {
            assert_eq!(SpanKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SpanKind::parse("comment"), None);
    }

    #[test]
    fn last_line_ignores_terminating_newline() {
        let span = Span::new(SpanKind::Code, Pos::new(0, 1, 1), Pos::new(4, 2, 1), "abc\n");
        assert_eq!(span.last_line(), 1);
        let span = Span::new(SpanKind::Code, Pos::new(0, 1, 1), Pos::new(5, 2, 2), "abc\nd");
        assert_eq!(span.last_line(), 2);
    }
}

//! Physical lines and the span segments that cover them.

use crate::span::{Span, SpanKind};

/// The part of one physical line covered by a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    /// Kind of the covering span.
    pub kind: SpanKind,
    /// First column (1-based).
    pub start_column: usize,
    /// Column just past the segment; equal to `start_column` for an empty line.
    pub end_column: usize,
}

impl LineSegment {
    /// Returns true if `column` falls within the segment.
    #[must_use]
    pub fn contains(&self, column: usize) -> bool {
        self.start_column <= column && column < self.end_column
    }

    /// Returns true for the zero-width segment of an empty line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_column == self.end_column
    }
}

/// A physical line with its text and span coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line number (1-based).
    pub number: usize,
    /// Text without the line terminator (`\n` or `\r\n`).
    pub text: String,
    /// Covering segments in column order.
    pub segments: Vec<LineSegment>,
}

impl SourceLine {
    /// Width of the line in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the line holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Blank and not inside a comment, string or pragma.
    #[must_use]
    pub fn is_blank_code(&self) -> bool {
        self.is_blank() && self.segments.iter().all(|s| s.kind == SpanKind::Code)
    }

    /// Kind of the span covering `column`.
    #[must_use]
    pub fn kind_at(&self, column: usize) -> Option<SpanKind> {
        self.segments
            .iter()
            .find(|s| s.contains(column))
            .map(|s| s.kind)
    }

    /// Segments whose kind is one of `kinds`.
    pub fn visible<'a>(&'a self, kinds: &'a [SpanKind]) -> impl Iterator<Item = &'a LineSegment> {
        self.segments.iter().filter(|s| kinds.contains(&s.kind))
    }

    /// Returns true if the line has a non-empty segment of one of `kinds`.
    #[must_use]
    pub fn has_visible(&self, kinds: &[SpanKind]) -> bool {
        self.visible(kinds).any(|s| !s.is_empty())
    }

    /// Returns true if `column` falls in a segment of one of `kinds`.
    #[must_use]
    pub fn is_visible(&self, column: usize, kinds: &[SpanKind]) -> bool {
        self.visible(kinds).any(|s| s.contains(column))
    }
}

/// All physical lines of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<SourceLine>,
}

impl SourceLines {
    /// Splits `text` into lines and attaches the segments of `spans`.
    ///
    /// A trailing newline does not start a new line.
    #[must_use]
    pub fn new(text: &str, spans: &[Span]) -> Self {
        let mut pieces: Vec<&str> = text.split('\n').collect();
        if text.is_empty() || text.ends_with('\n') {
            pieces.pop();
        }
        let mut lines: Vec<SourceLine> = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| SourceLine {
                number: i + 1,
                text: piece.strip_suffix('\r').unwrap_or(piece).to_string(),
                segments: Vec::new(),
            })
            .collect();

        for span in spans {
            let mut pos = span.start;
            let mut seg_start = pos.column;
            for c in span.text.chars() {
                if c == '\n' {
                    push_segment(&mut lines, pos.line, span.kind, seg_start, pos.column);
                    seg_start = 1;
                }
                pos = pos.advance(c);
            }
            if pos.column > seg_start {
                push_segment(&mut lines, pos.line, span.kind, seg_start, pos.column);
            }
        }

        for line in &mut lines {
            let limit = line.width() + 1;
            for seg in &mut line.segments {
                seg.start_column = seg.start_column.min(limit);
                seg.end_column = seg.end_column.min(limit);
            }
            line.segments
                .retain(|s| !s.is_empty() || (s.start_column == 1 && limit == 1));
            line.segments.dedup_by(|b, a| a.is_empty() && b.is_empty());
        }

        Self { lines }
    }

    /// Returns the line with the given 1-based number.
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&SourceLine> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Iterates over all lines.
    pub fn iter(&self) -> impl Iterator<Item = &SourceLine> {
        self.lines.iter()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true for an empty document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn push_segment(lines: &mut [SourceLine], line: usize, kind: SpanKind, start: usize, end: usize) {
    let Some(target) = line.checked_sub(1).and_then(|i| lines.get_mut(i)) else {
        return;
    };
    if end == start && !target.segments.is_empty() {
        return;
    }
    target.segments.push(LineSegment {
        kind,
        start_column: start,
        end_column: end,
    });
}

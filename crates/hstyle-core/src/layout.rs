//! Layout tracker: reconstructs block nesting from indentation.
//!
//! The tracker is an explicit stack machine over code tokens. Implicit
//! blocks (`where`, `do`, `of`, `let`) are anchored at the column of their
//! first token and closed when a line starts to the left of that column.
//! Bracketed regions (`(`, `[`, record braces, explicit layout braces) are
//! closed by their matching delimiter and suspend column-based layout.

use crate::scanner::{tokenize, Token, TokenKind};
use crate::span::{Pos, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Kind of a layout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// The whole module body (root of the tree).
    Module,
    /// Bindings after `where`.
    Where,
    /// Statements after `do` or `mdo`.
    Do,
    /// Alternatives after `of` or `\case`.
    Case,
    /// Bindings after `let`.
    Let,
    /// A brace-delimited record.
    Record,
    /// Methods of an `instance` or `class` declaration.
    Instance,
    /// A bracket-delimited list.
    List,
    /// A contiguous run of module-level imports.
    ImportGroup,
}

impl LayoutKind {
    /// All layout kinds, in declaration order.
    pub const ALL: [LayoutKind; 9] = [
        Self::Module,
        Self::Where,
        Self::Do,
        Self::Case,
        Self::Let,
        Self::Record,
        Self::Instance,
        Self::List,
        Self::ImportGroup,
    ];

    /// Returns the kebab-case name used in catalogue files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Where => "where",
            Self::Do => "do",
            Self::Case => "case",
            Self::Let => "let",
            Self::Record => "record",
            Self::Instance => "instance",
            Self::List => "list",
            Self::ImportGroup => "import-group",
        }
    }

    /// Looks up a layout kind by its kebab-case name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Bracket blocks have no layout items of their own.
    #[must_use]
    pub fn is_bracket(self) -> bool {
        matches!(self, Self::Record | Self::List)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a block in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// One item (declaration, statement, alternative) of a layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Line of the item's first token.
    pub start_line: usize,
    /// Column of the item's first token.
    pub start_column: usize,
    /// Last line holding a token of the item.
    pub end_line: usize,
    /// Index of the first token in [`Layout::tokens`].
    pub first_token: usize,
    /// Whether `=`, `<-` or `->` appeared in the item so far.
    pub binding: bool,
}

/// A nested structural region inferred from indentation or delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBlock {
    /// Position in the tree arena.
    pub id: BlockId,
    /// Block kind.
    pub kind: LayoutKind,
    /// Column sibling items must start at.
    pub anchor_column: usize,
    /// First line of the block.
    pub start_line: usize,
    /// Last line holding a token of the block.
    pub end_line: usize,
    /// Enclosing block, `None` for the root.
    pub parent: Option<BlockId>,
    /// Nested blocks in document order.
    pub children: Vec<BlockId>,
    /// Layout items in document order (empty for bracket blocks).
    pub items: Vec<LayoutItem>,
    /// Delimited by brackets or explicit braces rather than indentation.
    pub explicit: bool,
    /// The anchor token shares a line with the opener.
    pub inline: bool,
    /// The opener appeared inside an item that had seen a binding operator.
    pub in_binding: bool,
    /// Position of the opening keyword or bracket.
    pub opener: Option<Pos>,
}

impl LayoutBlock {
    fn new(id: BlockId, kind: LayoutKind, anchor_column: usize, start_line: usize) -> Self {
        Self {
            id,
            kind,
            anchor_column,
            start_line,
            end_line: start_line,
            parent: None,
            children: Vec::new(),
            items: Vec::new(),
            explicit: false,
            inline: false,
            in_binding: false,
            opener: None,
        }
    }
}

/// Arena of layout blocks; index 0 is the root `Module` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTree {
    blocks: Vec<LayoutBlock>,
}

impl LayoutTree {
    /// Returns the root block.
    #[must_use]
    pub fn root(&self) -> &LayoutBlock {
        &self.blocks[0]
    }

    /// Returns a block by id.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&LayoutBlock> {
        self.blocks.get(id.0)
    }

    /// Returns all blocks in creation order.
    #[must_use]
    pub fn blocks(&self) -> &[LayoutBlock] {
        &self.blocks
    }

    /// Returns the parent of a block.
    #[must_use]
    pub fn parent(&self, block: &LayoutBlock) -> Option<&LayoutBlock> {
        block.parent.and_then(|p| self.get(p))
    }

    /// Depth-first pre-order walk starting at the root.
    #[must_use]
    pub fn pre_order(&self) -> Vec<BlockId> {
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut stack = vec![BlockId(0)];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(block) = self.get(id) {
                stack.extend(block.children.iter().rev().copied());
            }
        }
        order
    }

    /// Innermost block whose line range contains `line`.
    #[must_use]
    pub fn innermost_at(&self, line: usize) -> &LayoutBlock {
        let mut current = self.root();
        while let Some(child) = current
            .children
            .iter()
            .filter_map(|&c| self.get(c))
            .find(|c| c.start_line <= line && line <= c.end_line)
        {
            current = child;
        }
        current
    }
}

/// Where a token ended up in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPlacement {
    /// Innermost block containing the token.
    pub block: BlockId,
    /// First token of the enclosing item, if the token belongs to one.
    pub item_head: Option<usize>,
}

/// Recoverable problems found while tracking layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A line starts between two enclosing anchors and cannot continue the
    /// outer item.
    #[error("line {} starts at column {}, between the anchors at columns {outer} and {inner}", at.line, at.column)]
    AmbiguousDedent {
        /// First token of the line.
        at: Pos,
        /// Anchor of the block the line was attached to (0 for none).
        outer: usize,
        /// Anchor of the innermost block the line closed.
        inner: usize,
    },

    /// A closing delimiter without an opener, or an opener never closed.
    #[error("unbalanced delimiter `{delimiter}` at {at}")]
    UnbalancedDelimiter {
        /// Position of the delimiter.
        at: Pos,
        /// The delimiter text.
        delimiter: String,
    },
}

impl LayoutError {
    /// Returns the position the error is reported at.
    #[must_use]
    pub fn position(&self) -> Pos {
        match self {
            Self::AmbiguousDedent { at, .. } | Self::UnbalancedDelimiter { at, .. } => *at,
        }
    }

    /// Returns the synthetic rule id used when reporting this error.
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::AmbiguousDedent { .. } => "ambiguous-dedent",
            Self::UnbalancedDelimiter { .. } => "unbalanced-delimiter",
        }
    }
}

/// Output of [`build_layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The block tree.
    pub tree: LayoutTree,
    /// Tokens of all code and literal spans.
    pub tokens: Vec<Token>,
    /// Placement of each token, parallel to `tokens`.
    pub placements: Vec<TokenPlacement>,
    /// Recovered problems.
    pub errors: Vec<LayoutError>,
}

impl Layout {
    /// Returns the first token of the item containing token `index`.
    #[must_use]
    pub fn item_head(&self, index: usize) -> Option<&Token> {
        self.placements
            .get(index)
            .and_then(|p| p.item_head)
            .and_then(|h| self.tokens.get(h))
    }
}

/// Builds the layout tree for a scanned document.
#[must_use]
pub fn build_layout(spans: &[Span]) -> Layout {
    let tokens = tokenize(spans);
    let last_line = spans.last().map_or(1, Span::last_line);
    let (tree, placements, errors) = Tracker::new(&tokens).run(last_line);
    debug!(
        "Built layout: {} blocks, {} tokens, {} errors",
        tree.blocks.len(),
        tokens.len(),
        errors.len()
    );
    Layout {
        tree,
        tokens,
        placements,
        errors,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Block(BlockId),
    Paren(Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    /// Not yet known whether the module has a header.
    Start,
    /// Inside `module Name (exports)` before its `where`.
    Open,
    /// The module body has started.
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: LayoutKind,
    opener: Pos,
    in_binding: bool,
    root: bool,
}

struct Tracker<'t> {
    tokens: &'t [Token],
    blocks: Vec<LayoutBlock>,
    stack: Vec<Frame>,
    pending: Option<Pending>,
    await_item: Option<BlockId>,
    header: Header,
    placements: Vec<TokenPlacement>,
    errors: Vec<LayoutError>,
}

impl<'t> Tracker<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let root = LayoutBlock::new(BlockId(0), LayoutKind::Module, 1, 1);
        Self {
            tokens,
            blocks: vec![root],
            stack: vec![Frame::Block(BlockId(0))],
            pending: None,
            await_item: None,
            header: Header::Start,
            placements: Vec::with_capacity(tokens.len()),
            errors: Vec::new(),
        }
    }

    fn run(mut self, last_line: usize) -> (LayoutTree, Vec<TokenPlacement>, Vec<LayoutError>) {
        for index in 0..self.tokens.len() {
            self.step(index);
        }

        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Paren(at) => self.errors.push(LayoutError::UnbalancedDelimiter {
                    at,
                    delimiter: "(".to_string(),
                }),
                Frame::Block(id) if id.0 != 0 && self.blocks[id.0].kind.is_bracket() => {
                    let block = &self.blocks[id.0];
                    if let Some(at) = block.opener {
                        let delimiter = if block.kind == LayoutKind::List { "[" } else { "{" };
                        self.errors.push(LayoutError::UnbalancedDelimiter {
                            at,
                            delimiter: delimiter.to_string(),
                        });
                    }
                }
                Frame::Block(_) => {}
            }
        }
        let root = &mut self.blocks[0];
        root.end_line = root.end_line.max(last_line);

        (
            LayoutTree {
                blocks: self.blocks,
            },
            self.placements,
            self.errors,
        )
    }

    fn token(&self, index: usize) -> &'t Token {
        &self.tokens[index]
    }

    fn starts_line(&self, index: usize) -> bool {
        index == 0 || self.tokens[index].start.line > self.tokens[index - 1].end.line
    }

    fn step(&mut self, index: usize) {
        let tok = self.token(index);

        if self.header == Header::Start {
            if tok.is_keyword("module") {
                self.header = Header::Open;
            } else {
                self.header = Header::Done;
                self.blocks[0].anchor_column = tok.start.column;
                self.start_item(BlockId(0), index);
                self.place_and_handle(index);
                return;
            }
        }

        if self.header == Header::Open {
            self.place(index);
            if tok.is_punct("(") {
                self.stack.push(Frame::Paren(tok.start));
            } else if tok.is_punct(")") {
                if matches!(self.stack.last(), Some(Frame::Paren(_))) {
                    self.stack.pop();
                }
            } else if tok.is_keyword("where") && self.stack.len() == 1 {
                self.pending = Some(Pending {
                    kind: LayoutKind::Module,
                    opener: tok.start,
                    in_binding: false,
                    root: true,
                });
                self.header = Header::Done;
            }
            return;
        }

        if let Some(block) = self.await_item.take() {
            if !tok.is_punct("}") {
                self.start_item(block, index);
            }
        }

        if let Some(pending) = self.pending.take() {
            if self.open_pending(pending, index) {
                return;
            }
        } else if self.starts_line(index) {
            self.resolve_line(index);
        }

        self.place_and_handle(index);
    }

    fn place_and_handle(&mut self, index: usize) {
        let tok = self.token(index);
        if tok.is_punct("[") || tok.is_punct("{") {
            self.handle_token(index);
            self.place(index);
        } else {
            self.place(index);
            self.handle_token(index);
        }
    }

    /// Opens the block announced by a layout keyword. Returns true if the
    /// token was consumed as an explicit opening brace.
    fn open_pending(&mut self, pending: Pending, index: usize) -> bool {
        let tok = self.token(index);

        if pending.root {
            if tok.is_punct("{") {
                let root = &mut self.blocks[0];
                root.explicit = true;
                root.anchor_column = tok.start.column;
                self.await_item = Some(BlockId(0));
                self.place(index);
                return true;
            }
            self.blocks[0].anchor_column = tok.start.column;
            self.start_item(BlockId(0), index);
            return false;
        }

        if tok.is_punct("{") {
            let id = self.push_block(pending.kind, tok.start.column, tok.start.line);
            let block = &mut self.blocks[id.0];
            block.explicit = true;
            block.inline = tok.start.line == pending.opener.line;
            block.in_binding = pending.in_binding;
            block.opener = Some(pending.opener);
            self.await_item = Some(id);
            self.place(index);
            return true;
        }

        let enclosing = match self.stack.last() {
            Some(Frame::Block(id)) if !self.blocks[id.0].explicit => {
                self.blocks[id.0].anchor_column
            }
            _ => 0,
        };
        if tok.start.column <= enclosing {
            debug!(
                "Empty {} block at line {}",
                pending.kind, pending.opener.line
            );
            if self.starts_line(index) {
                self.resolve_line(index);
            }
            return false;
        }

        let id = self.push_block(pending.kind, tok.start.column, tok.start.line);
        let block = &mut self.blocks[id.0];
        block.inline = tok.start.line == pending.opener.line;
        block.in_binding = pending.in_binding;
        block.opener = Some(pending.opener);
        self.start_item(id, index);
        false
    }

    /// Column-based handling of the first token on a line.
    fn resolve_line(&mut self, index: usize) {
        let tok = self.token(index);
        let column = tok.start.column;
        let mut popped_anchor = None;

        loop {
            let Some(&Frame::Block(top)) = self.stack.last() else {
                return;
            };
            let block = &self.blocks[top.0];
            if block.explicit {
                return;
            }
            let anchor = block.anchor_column;
            let kind = block.kind;

            if column == anchor {
                let closes_group = kind == LayoutKind::ImportGroup && !tok.is_keyword("import");
                let closes_for_where = tok.is_keyword("where")
                    && matches!(kind, LayoutKind::Do | LayoutKind::Case | LayoutKind::Let)
                    && top.0 != 0;
                if closes_group || closes_for_where {
                    self.stack.pop();
                    popped_anchor = Some(anchor);
                    continue;
                }
                self.start_item(top, index);
                return;
            }

            if column > anchor {
                if let Some(inner) = popped_anchor {
                    if !continues_expression(tok) {
                        self.errors.push(LayoutError::AmbiguousDedent {
                            at: tok.start,
                            outer: anchor,
                            inner,
                        });
                    }
                }
                return;
            }

            if top.0 == 0 {
                self.errors.push(LayoutError::AmbiguousDedent {
                    at: tok.start,
                    outer: 0,
                    inner: anchor,
                });
                return;
            }
            self.stack.pop();
            popped_anchor = Some(anchor);
        }
    }

    fn handle_token(&mut self, index: usize) {
        let tok = self.token(index);
        match tok.kind {
            TokenKind::Keyword => match tok.text.as_str() {
                "where" => {
                    let kind = match self.current_item_head() {
                        Some(head) if head.is_keyword("instance") || head.is_keyword("class") => {
                            LayoutKind::Instance
                        }
                        _ => LayoutKind::Where,
                    };
                    self.set_pending(kind, tok.start);
                }
                "let" => self.set_pending(LayoutKind::Let, tok.start),
                "do" | "mdo" => self.set_pending(LayoutKind::Do, tok.start),
                "of" => self.set_pending(LayoutKind::Case, tok.start),
                "case" if index > 0 && self.token(index - 1).is_op("\\") => {
                    self.set_pending(LayoutKind::Case, tok.start);
                }
                "in" => self.close_let(),
                _ => {}
            },
            TokenKind::Punctuation => match tok.text.as_str() {
                "(" => self.stack.push(Frame::Paren(tok.start)),
                "[" => self.push_bracket(LayoutKind::List, index),
                "{" => self.push_bracket(LayoutKind::Record, index),
                ")" | "]" | "}" => self.close_bracket(index),
                "," => self.close_inside_bracket(),
                ";" => {
                    if let Some(&Frame::Block(top)) = self.stack.last() {
                        let block = &self.blocks[top.0];
                        if block.explicit && !block.kind.is_bracket() {
                            self.await_item = Some(top);
                        }
                    }
                }
                _ => {}
            },
            TokenKind::Operator if matches!(tok.text.as_str(), "=" | "<-" | "->") => {
                if let Some(item) = self.current_item_mut() {
                    item.binding = true;
                }
            }
            _ => {}
        }
    }

    fn set_pending(&mut self, kind: LayoutKind, opener: Pos) {
        let in_binding = self.current_item_mut().is_some_and(|item| item.binding);
        self.pending = Some(Pending {
            kind,
            opener,
            in_binding,
            root: false,
        });
    }

    fn push_block(&mut self, kind: LayoutKind, anchor: usize, start_line: usize) -> BlockId {
        let id = BlockId(self.blocks.len());
        let parent = self.innermost_block();
        let mut block = LayoutBlock::new(id, kind, anchor, start_line);
        block.parent = Some(parent);
        self.blocks.push(block);
        self.blocks[parent.0].children.push(id);
        self.stack.push(Frame::Block(id));
        id
    }

    fn push_bracket(&mut self, kind: LayoutKind, index: usize) {
        let tok = self.token(index);
        let in_binding = self.current_item_mut().is_some_and(|item| item.binding);
        let inline = !self.starts_line(index);
        let id = self.push_block(kind, tok.start.column, tok.start.line);
        let block = &mut self.blocks[id.0];
        block.explicit = true;
        block.inline = inline;
        block.in_binding = in_binding;
        block.opener = Some(tok.start);
    }

    fn innermost_block(&self) -> BlockId {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Block(id) => Some(*id),
                Frame::Paren(_) => None,
            })
            .unwrap_or(BlockId(0))
    }

    /// Innermost block that carries layout items.
    fn item_block(&self) -> Option<BlockId> {
        self.stack.iter().rev().find_map(|f| match f {
            Frame::Block(id)
                if !self.blocks[id.0].kind.is_bracket() && !self.blocks[id.0].items.is_empty() =>
            {
                Some(*id)
            }
            _ => None,
        })
    }

    fn current_item_mut(&mut self) -> Option<&mut LayoutItem> {
        let id = self.item_block()?;
        self.blocks[id.0].items.last_mut()
    }

    fn current_item_head(&self) -> Option<&'t Token> {
        let id = self.item_block()?;
        let head = self.blocks[id.0].items.last()?.first_token;
        self.tokens.get(head)
    }

    fn start_item(&mut self, id: BlockId, index: usize) {
        let tok = self.token(index);
        self.blocks[id.0].items.push(LayoutItem {
            start_line: tok.start.line,
            start_column: tok.start.column,
            end_line: tok.end.line,
            first_token: index,
            binding: false,
        });
        if id.0 == 0 && tok.is_keyword("import") {
            let group = self.push_block(LayoutKind::ImportGroup, tok.start.column, tok.start.line);
            self.start_item(group, index);
        }
    }

    fn place(&mut self, index: usize) {
        let line = self.token(index).end.line;
        for frame in &self.stack {
            if let Frame::Block(id) = frame {
                let block = &mut self.blocks[id.0];
                block.end_line = block.end_line.max(line);
                if let Some(item) = block.items.last_mut() {
                    item.end_line = item.end_line.max(line);
                }
            }
        }
        let item_head = self
            .item_block()
            .and_then(|id| self.blocks[id.0].items.last())
            .map(|item| item.first_token);
        self.placements.push(TokenPlacement {
            block: self.innermost_block(),
            item_head,
        });
    }

    /// `in` closes implicit blocks up to and including the innermost `let`.
    fn close_let(&mut self) {
        let position = self.stack.iter().rposition(|f| match f {
            Frame::Block(id) => {
                let block = &self.blocks[id.0];
                block.explicit || block.kind == LayoutKind::Let
            }
            Frame::Paren(_) => true,
        });
        if let Some(pos) = position {
            if let Frame::Block(id) = self.stack[pos] {
                let block = &self.blocks[id.0];
                if !block.explicit && block.kind == LayoutKind::Let && pos > 0 {
                    self.stack.truncate(pos);
                }
            }
        }
    }

    fn delimiter_frame(&self) -> Option<usize> {
        self.stack.iter().rposition(|f| match f {
            Frame::Block(id) => self.blocks[id.0].explicit,
            Frame::Paren(_) => true,
        })
    }

    fn close_bracket(&mut self, index: usize) {
        let tok = self.token(index);
        let Some(pos) = self.delimiter_frame() else {
            self.errors.push(LayoutError::UnbalancedDelimiter {
                at: tok.start,
                delimiter: tok.text.clone(),
            });
            return;
        };
        let matches = match self.stack[pos] {
            Frame::Paren(_) => tok.text == ")",
            Frame::Block(id) => match self.blocks[id.0].kind {
                LayoutKind::List => tok.text == "]",
                _ => tok.text == "}",
            },
        };
        if !matches {
            self.errors.push(LayoutError::UnbalancedDelimiter {
                at: tok.start,
                delimiter: tok.text.clone(),
            });
            return;
        }
        if pos > 0 {
            self.stack.truncate(pos);
        }
    }

    /// A comma closes implicit blocks opened inside the current brackets.
    fn close_inside_bracket(&mut self) {
        if let Some(pos) = self.delimiter_frame() {
            if pos > 0 {
                self.stack.truncate(pos + 1);
            }
        }
    }
}

/// Tokens that can legitimately continue an outer item after a dedent.
fn continues_expression(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Operator | TokenKind::Identifier(crate::scanner::CaseClass::Operator) => true,
        TokenKind::Punctuation => matches!(tok.text.as_str(), ")" | "]" | "}" | "," | ";" | "`"),
        TokenKind::Keyword => matches!(
            tok.text.as_str(),
            "where" | "then" | "else" | "of" | "in" | "deriving"
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn layout(text: &str) -> Layout {
        build_layout(&scan(text).spans)
    }

    fn kinds(layout: &Layout) -> Vec<(LayoutKind, usize)> {
        layout
            .tree
            .pre_order()
            .into_iter()
            .filter_map(|id| layout.tree.get(id))
            .map(|b| (b.kind, b.anchor_column))
            .collect()
    }

    fn assert_sound(layout: &Layout) {
        for block in layout.tree.blocks() {
            assert!(block.start_line <= block.end_line, "{block:?}");
            if let Some(parent) = layout.tree.parent(block) {
                assert!(parent.start_line <= block.start_line, "{block:?}");
                assert!(block.end_line <= parent.end_line, "{block:?}");
            }
            for pair in block.children.windows(2) {
                let a = layout.tree.get(pair[0]).unwrap();
                let b = layout.tree.get(pair[1]).unwrap();
                assert!(a.end_line <= b.start_line, "{a:?} overlaps {b:?}");
            }
        }
    }

    const SAMPLE: &str = "\
module Main
    ( main
    ) where

import Data.List (sort)
import qualified Data.Map as Map

main :: IO ()
main = do
    let xs = [3, 1, 2]
    print (sort xs)
    case xs of
        [] -> pure ()
        _ -> go
  where
    go = pure ()

data Point = Point
  { px :: Int
  , py :: Int
  }
";

    #[test]
    fn builds_nested_blocks() {
        let layout = layout(SAMPLE);
        assert!(layout.errors.is_empty(), "{:?}", layout.errors);
        assert_eq!(
            kinds(&layout),
            vec![
                (LayoutKind::Module, 1),
                (LayoutKind::ImportGroup, 1),
                (LayoutKind::Do, 5),
                (LayoutKind::Let, 9),
                (LayoutKind::List, 14),
                (LayoutKind::Case, 9),
                (LayoutKind::List, 9),
                (LayoutKind::Where, 5),
                (LayoutKind::Record, 3),
            ]
        );
        assert_sound(&layout);
    }

    #[test]
    fn root_items_and_import_group() {
        let layout = layout(SAMPLE);
        let root = layout.tree.root();
        let starts: Vec<usize> = root.items.iter().map(|i| i.start_line).collect();
        assert_eq!(starts, vec![5, 8, 9, 18]);
        assert_eq!(root.items[0].end_line, 6);
        assert_eq!(root.items[2].end_line, 16);

        let group = layout.tree.get(root.children[0]).unwrap();
        assert_eq!(group.kind, LayoutKind::ImportGroup);
        assert_eq!(group.items.len(), 2);
        assert_eq!((group.start_line, group.end_line), (5, 6));
    }

    #[test]
    fn block_lines_and_binding_context() {
        let layout = layout(SAMPLE);
        let do_block = layout
            .tree
            .blocks()
            .iter()
            .find(|b| b.kind == LayoutKind::Do)
            .unwrap();
        assert_eq!((do_block.start_line, do_block.end_line), (10, 14));
        assert!(do_block.in_binding);
        assert!(!do_block.inline);
        assert_eq!(do_block.items.len(), 3);

        let let_block = layout
            .tree
            .blocks()
            .iter()
            .find(|b| b.kind == LayoutKind::Let)
            .unwrap();
        assert!(let_block.inline);

        let where_block = layout
            .tree
            .blocks()
            .iter()
            .find(|b| b.kind == LayoutKind::Where)
            .unwrap();
        assert_eq!(where_block.parent, Some(BlockId(0)));
        assert_eq!((where_block.start_line, where_block.end_line), (16, 16));
    }

    #[test]
    fn instance_where_opens_instance_block() {
        let layout = layout("instance Show Foo where\n  show _ = \"Foo\"\n");
        assert_eq!(
            kinds(&layout),
            vec![(LayoutKind::Module, 1), (LayoutKind::Instance, 3)]
        );
    }

    #[test]
    fn explicit_braces_override_columns() {
        let layout = layout("f = do { a; b\n ; c }\ng = 1\n");
        assert!(layout.errors.is_empty(), "{:?}", layout.errors);
        let block = layout.tree.get(BlockId(1)).unwrap();
        assert_eq!(block.kind, LayoutKind::Do);
        assert!(block.explicit);
        assert_eq!(block.items.len(), 3);
        assert_eq!(layout.tree.root().items.len(), 2);
    }

    #[test]
    fn let_in_closes_let_block() {
        let layout = layout("f = let x = 1\n        y = 2\n    in x + y\ng = 2\n");
        assert!(layout.errors.is_empty(), "{:?}", layout.errors);
        let let_block = layout.tree.get(BlockId(1)).unwrap();
        assert_eq!(let_block.kind, LayoutKind::Let);
        assert_eq!(let_block.items.len(), 2);
        assert_eq!(let_block.end_line, 2);
        assert_eq!(layout.tree.root().items.len(), 2);
    }

    #[test]
    fn ambiguous_dedent_is_reported_and_recovered() {
        let layout = layout("main = do\n    foo\n  bar\nbaz = 1\n");
        assert_eq!(layout.errors.len(), 1);
        assert!(matches!(
            layout.errors[0],
            LayoutError::AmbiguousDedent { at, outer: 1, inner: 5 } if at.line == 3
        ));
        assert_eq!(layout.tree.root().items.len(), 2);
    }

    #[test]
    fn where_continuation_is_not_ambiguous() {
        let layout = layout("main = do\n    foo\n  where\n    foo = 1\n");
        assert!(layout.errors.is_empty(), "{:?}", layout.errors);
    }

    #[test]
    fn unbalanced_delimiters_are_reported() {
        let layout = layout("f = (1 + 2\ng = 3 ]\n");
        let delimiters: Vec<&str> = layout
            .errors
            .iter()
            .filter_map(|e| match e {
                LayoutError::UnbalancedDelimiter { delimiter, .. } => Some(delimiter.as_str()),
                LayoutError::AmbiguousDedent { .. } => None,
            })
            .collect();
        assert_eq!(delimiters, vec!["]", "("]);
    }

    #[test]
    fn item_heads_are_recorded() {
        let layout = layout("data Foo = Foo { fooBar :: Int }\n");
        let field = layout.tokens.iter().position(|t| t.text == "fooBar").unwrap();
        assert_eq!(layout.item_head(field).map(|t| t.text.as_str()), Some("data"));
        let record = layout.tree.get(layout.placements[field].block).unwrap();
        assert_eq!(record.kind, LayoutKind::Record);
    }

    #[test]
    fn innermost_block_lookup() {
        let layout = layout(SAMPLE);
        assert_eq!(layout.tree.innermost_at(11).kind, LayoutKind::Do);
        assert_eq!(layout.tree.innermost_at(16).kind, LayoutKind::Where);
        assert_eq!(layout.tree.innermost_at(8).kind, LayoutKind::Module);
    }

    #[test]
    fn layout_is_deterministic() {
        assert_eq!(layout(SAMPLE), layout(SAMPLE));
    }
}

//! Rule evaluator: dispatches every catalogue entry over one document.
//!
//! Passes run in a fixed order (lines, tokens, blocks, document) so the
//! pre-sort output is reproducible.

use crate::catalogue::{Catalogue, CatalogueEntry};
use crate::context::{BlockContext, DocumentContext, Finding, LineContext, TokenContext};
use crate::layout::{Layout, LayoutError};
use crate::lines::SourceLines;
use crate::rule::RuleScope;
use crate::scanner::ScanError;
use crate::span::Span;
use crate::types::{Severity, Violation};
use tracing::debug;

/// Evaluates all catalogue rules against a scanned, laid-out document.
#[must_use]
pub fn evaluate(spans: &[Span], layout: &Layout, catalogue: &Catalogue) -> Vec<Violation> {
    let text: String = spans.iter().map(|s| s.text.as_str()).collect();
    let lines = SourceLines::new(&text, spans);
    let doc = DocumentContext::new(&text, spans, &lines, layout);

    let by_scope = |scope: RuleScope| -> Vec<&CatalogueEntry> {
        catalogue
            .entries()
            .iter()
            .filter(|e| e.definition().check().scope() == scope)
            .collect()
    };

    let mut violations = Vec::new();
    line_pass(doc, &by_scope(RuleScope::Line), &mut violations);
    token_pass(doc, &by_scope(RuleScope::Token), &mut violations);
    block_pass(doc, &by_scope(RuleScope::Block), &mut violations);
    document_pass(doc, &by_scope(RuleScope::Document), &mut violations);

    debug!(
        "Evaluated {} rules over {} lines: {} findings",
        catalogue.len(),
        lines.len(),
        violations.len()
    );
    violations
}

fn stamp(entry: &CatalogueEntry, finding: Finding) -> Violation {
    let definition = entry.definition();
    Violation::new(
        definition.id().as_str(),
        definition.severity(),
        finding.start,
        finding.end,
        finding.message,
    )
}

fn line_pass(doc: DocumentContext<'_>, rules: &[&CatalogueEntry], out: &mut Vec<Violation>) {
    if rules.is_empty() {
        return;
    }
    for line in doc.lines.iter() {
        let block = doc.layout.tree.innermost_at(line.number);
        // An empty line has only a zero-width segment.
        let kind = line
            .kind_at(1)
            .or_else(|| line.segments.first().map(|s| s.kind));
        for entry in rules {
            let kinds = entry.definition().applies_to().spans();
            if !line.has_visible(kinds) {
                continue;
            }
            let ctx = LineContext {
                doc: doc.with_kinds(kinds),
                line,
                kind,
                block,
                segments: line.visible(kinds).collect(),
            };
            for finding in entry.rule().check_line(&ctx) {
                if finding.start.0 == line.number && ctx.is_visible(finding.start.1) {
                    out.push(stamp(entry, finding));
                } else {
                    debug!(
                        "Discarding {} finding outside visible segments at {}:{}",
                        entry.id(),
                        finding.start.0,
                        finding.start.1
                    );
                }
            }
        }
    }
}

fn token_pass(doc: DocumentContext<'_>, rules: &[&CatalogueEntry], out: &mut Vec<Violation>) {
    if rules.is_empty() {
        return;
    }
    let layout = doc.layout;
    for (index, token) in layout.tokens.iter().enumerate() {
        let Some(placement) = layout.placements.get(index) else {
            continue;
        };
        let Some(block) = layout.tree.get(placement.block) else {
            continue;
        };
        for entry in rules {
            let kinds = entry.definition().applies_to().spans();
            if !kinds.contains(&token.source) {
                continue;
            }
            let ctx = TokenContext {
                doc: doc.with_kinds(kinds),
                index,
                token,
                block,
                item_head: layout.item_head(index),
            };
            out.extend(entry.rule().check_token(&ctx).into_iter().map(|f| stamp(entry, f)));
        }
    }
}

fn block_pass(doc: DocumentContext<'_>, rules: &[&CatalogueEntry], out: &mut Vec<Violation>) {
    if rules.is_empty() {
        return;
    }
    let tree = &doc.layout.tree;
    for id in tree.pre_order() {
        let Some(block) = tree.get(id) else {
            continue;
        };
        for entry in rules {
            if !entry.definition().applies_to().blocks().contains(&block.kind) {
                continue;
            }
            let ctx = BlockContext {
                doc,
                block,
                parent: tree.parent(block),
            };
            out.extend(entry.rule().check_block(&ctx).into_iter().map(|f| stamp(entry, f)));
        }
    }
}

fn document_pass(doc: DocumentContext<'_>, rules: &[&CatalogueEntry], out: &mut Vec<Violation>) {
    for entry in rules {
        let ctx = doc.with_kinds(entry.definition().applies_to().spans());
        out.extend(entry.rule().check_document(&ctx).into_iter().map(|f| stamp(entry, f)));
    }
}

/// Converts scanner and layout recovery errors into `Info` violations.
#[must_use]
pub fn recovery_violations(scan_errors: &[ScanError], layout_errors: &[LayoutError]) -> Vec<Violation> {
    let scanned = scan_errors.iter().map(|e| {
        let (start, end) = e.range();
        Violation::new(
            e.rule_id(),
            Severity::Info,
            (start.line, start.column),
            (end.line, end.column),
            e.to_string(),
        )
    });
    let laid_out = layout_errors.iter().map(|e| {
        let at = e.position();
        Violation::new(
            e.rule_id(),
            Severity::Info,
            (at.line, at.column),
            (at.line, at.column + 1),
            e.to_string(),
        )
    });
    scanned.chain(laid_out).collect()
}

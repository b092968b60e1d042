//! Core types for style violations and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for style violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Parses a lowercase severity name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A style violation found in one document.
///
/// Lines and columns are 1-based; columns count characters. The end
/// position is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Id of the catalogue entry that produced the violation.
    pub rule_id: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Start line.
    pub line: usize,
    /// Start column.
    pub column: usize,
    /// End line.
    pub end_line: usize,
    /// End column.
    pub end_column: usize,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        (line, column): (usize, usize),
        (end_line, end_column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            line,
            column,
            end_line,
            end_column,
            message: message.into(),
        }
    }

    /// Ordering key used by the reporter.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize, &str) {
        (self.line, self.column, &self.rule_id)
    }

    /// Computes the byte range of this violation within `source`.
    #[must_use]
    pub fn source_span(&self, source: &str) -> SourceSpan {
        let start = offset_for(source, self.line, self.column);
        let end = offset_for(source, self.end_line, self.end_column).max(start);
        SourceSpan::from((start, end - start))
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, self.severity, self.rule_id, self.message
        )
    }
}

/// Byte offset of a 1-based line and character column, clamped to the text.
#[must_use]
pub fn offset_for(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, line_content) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within: usize = line_content
                .chars()
                .take(column.saturating_sub(1))
                .map(char::len_utf8)
                .sum();
            return offset + within;
        }
        offset += line_content.len();
    }
    offset
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {message}")]
pub struct ViolationDiagnostic {
    rule_id: String,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{severity}")]
    span: SourceSpan,
    severity: Severity,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violation` in the document `name`.
    #[must_use]
    pub fn new(violation: &Violation, name: &str, source: &str) -> Self {
        Self {
            rule_id: violation.rule_id.clone(),
            message: violation.message.clone(),
            span: violation.source_span(source),
            source_code: NamedSource::new(name, source.to_string()),
            severity: violation.severity,
        }
    }
}

/// Violations of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path of the document, relative to the analysis root when possible.
    pub path: PathBuf,
    /// Ordered violations.
    pub violations: Vec<Violation>,
}

/// Result of running a style check over several documents.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Per-document reports, ordered by path.
    pub documents: Vec<DocumentReport>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Files that could not be read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<PathBuf>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over all violations with their document path.
    pub fn violations(&self) -> impl Iterator<Item = (&PathBuf, &Violation)> {
        self.documents
            .iter()
            .flat_map(|d| d.violations.iter().map(move |v| (&d.path, v)))
    }

    /// Total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.documents.iter().map(|d| d.violations.len()).sum()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|(_, v)| v.severity >= severity)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for (_, v) in self.violations() {
            match v.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Formats failing violations as a multi-line report.
    #[must_use]
    pub fn format_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<(&PathBuf, &Violation)> = self
            .violations()
            .filter(|(_, v)| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(report, "\n=== hstyle: {} violation(s) ===\n", failing.len());
        for (path, v) in &failing {
            let _ = writeln!(report, "{}:{v}", path.display());
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "\nTotal: {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );
        report
    }
}

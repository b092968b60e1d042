//! Output formatting for lint results.

use anyhow::{Context, Result};
use hstyle_core::{LintResult, Severity, ViolationDiagnostic};
use std::fmt::Write;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analysis root the document paths are relative to; the
/// pretty format reads the documents again from there.
pub fn print(result: &LintResult, root: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Pretty => print_pretty(result, root)?,
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    )
}

fn render_text(result: &LintResult) -> String {
    let mut out = String::new();

    for (path, violation) in result.violations() {
        let _ = writeln!(
            out,
            "{} at {}:{}:{}",
            violation.rule_id,
            path.display(),
            violation.line,
            violation.column,
        );
        let _ = writeln!(
            out,
            "  {}: {}\n",
            severity_indicator(violation.severity),
            violation.message
        );
    }

    let (errors, warnings, _) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    let _ = writeln!(out, "{summary_color}{}\x1b[0m", summary(result));
    out
}

fn print_pretty(result: &LintResult, root: &Path) -> Result<()> {
    for document in result.documents.iter().filter(|d| !d.violations.is_empty()) {
        let full_path = root.join(&document.path);
        let source = std::fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to re-read {}", full_path.display()))?;
        let name = document.path.display().to_string();

        for violation in &document.violations {
            let report = miette::Report::new(ViolationDiagnostic::new(violation, &name, &source));
            println!("{report:?}");
        }
    }
    println!("{}", summary(result));
    Ok(())
}

fn render_json(result: &LintResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for (path, violation) in result.violations() {
        let _ = writeln!(out, "{}:{violation}", path.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstyle_core::{DocumentReport, Violation};
    use std::path::PathBuf;

    fn sample() -> LintResult {
        LintResult {
            documents: vec![
                DocumentReport {
                    path: PathBuf::from("src/Lib.hs"),
                    violations: vec![
                        Violation::new(
                            "trailing-whitespace",
                            Severity::Error,
                            (1, 8),
                            (1, 9),
                            "trailing whitespace",
                        ),
                        Violation::new(
                            "comment-placement",
                            Severity::Warning,
                            (3, 7),
                            (3, 9),
                            "end-of-line comment needs at least 2 spaces before it, found 1",
                        ),
                    ],
                },
                DocumentReport {
                    path: PathBuf::from("src/Main.hs"),
                    violations: Vec::new(),
                },
            ],
            files_checked: 2,
            failed: Vec::new(),
        }
    }

    #[test]
    fn compact_output() {
        insta::assert_snapshot!(render_compact(&sample()), @r"
        src/Lib.hs:1:8: error [trailing-whitespace] trailing whitespace
        src/Lib.hs:3:7: warning [comment-placement] end-of-line comment needs at least 2 spaces before it, found 1
        ");
    }

    #[test]
    fn text_output_ends_with_summary() {
        let text = render_text(&sample());
        assert!(text.contains("trailing-whitespace at src/Lib.hs:1:8"));
        assert!(text.contains("Found 1 error(s), 1 warning(s), 0 info(s) in 2 file(s)"));
    }

    #[test]
    fn json_output_round_trips() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["files_checked"], 2);
        assert_eq!(value["documents"][0]["path"], "src/Lib.hs");
        assert_eq!(value["documents"][0]["violations"][1]["severity"], "warning");
        assert!(value.get("failed").is_none());
    }

    #[test]
    fn pretty_output_reads_documents_from_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/Lib.hs"), "foo = 1 \n\nx = 1 -- c\n").unwrap();
        assert!(print_pretty(&sample(), tmp.path()).is_ok());

        let missing = tempfile::TempDir::new().unwrap();
        assert!(print_pretty(&sample(), missing.path()).is_err());
    }
}

//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::{Deserialize, Serialize};

/// Raw TOML representation of a catalogue: a list of `[[rules]]` tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogueDto {
    /// Rule entries in catalogue order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// TOML representation of one rule entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleDto {
    /// Rule id (e.g., "line-length").
    pub id: String,
    /// Span or layout kind names; the family default when omitted.
    #[serde(default)]
    pub applies_to: Vec<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Family tag and options.
    #[serde(flatten)]
    pub check: CheckDto,
}

/// Family tag (`check = "..."`) with the family's options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum CheckDto {
    /// `max-line-length`.
    MaxLineLength {
        /// Maximum width.
        #[serde(default = "default_line_length")]
        n: i64,
    },
    /// `no-trailing-whitespace`.
    NoTrailingWhitespace,
    /// `no-tabs`.
    NoTabs,
    /// `indent-step`.
    #[serde(rename_all = "kebab-case")]
    IndentStep {
        /// Required step.
        #[serde(default = "default_step")]
        k: i64,
        /// Step allowed for exception kinds under a binding.
        #[serde(default = "default_exception_step")]
        exception_step: i64,
        /// Exception layout kinds.
        #[serde(default = "default_exceptions")]
        exceptions: Vec<String>,
    },
    /// `blank-lines-between-top-level`.
    BlankLinesBetweenTopLevel {
        /// Required blank lines.
        #[serde(default = "default_blank_lines")]
        exactly: i64,
    },
    /// `import-order`.
    #[serde(rename_all = "kebab-case")]
    ImportOrder {
        /// Module that must come last; empty for none.
        #[serde(default = "default_last_import")]
        last: String,
        /// Whether blank lines start new sections.
        #[serde(default = "default_true")]
        reset_on_blank_line: bool,
    },
    /// `naming-case`.
    NamingCase {
        /// Permitted abbreviations.
        #[serde(default = "default_abbreviations")]
        abbreviations: Vec<String>,
    },
    /// `export-list-structure`.
    ExportListStructure,
    /// `pragma-placement`.
    #[serde(rename_all = "kebab-case")]
    PragmaPlacement {
        /// Header pragma names.
        #[serde(default = "default_header_pragmas")]
        header_pragmas: Vec<String>,
    },
    /// `comment-placement`.
    #[serde(rename_all = "kebab-case")]
    CommentPlacement {
        /// Minimum gap in spaces.
        #[serde(default = "default_min_gap")]
        min_gap: i64,
    },
    /// `haddock-presence`.
    HaddockPresence,
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_line_length() -> i64 {
    80
}

fn default_step() -> i64 {
    2
}

fn default_exception_step() -> i64 {
    4
}

fn default_exceptions() -> Vec<String> {
    ["do", "case", "let"].map(String::from).to_vec()
}

fn default_blank_lines() -> i64 {
    1
}

fn default_last_import() -> String {
    "Prelude".to_string()
}

fn default_true() -> bool {
    true
}

fn default_abbreviations() -> Vec<String> {
    ["IO", "ID", "OK", "UI"].map(String::from).to_vec()
}

fn default_header_pragmas() -> Vec<String> {
    ["LANGUAGE", "OPTIONS_GHC", "OPTIONS_HADDOCK", "INCLUDE"]
        .map(String::from)
        .to_vec()
}

fn default_min_gap() -> i64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: CatalogueDto = toml::from_str("").unwrap();
        assert!(dto.rules.is_empty());
    }

    #[test]
    fn deserialize_options_and_defaults() {
        let toml_str = r#"
[[rules]]
id = "line-length"
check = "max-line-length"
n = 100
applies-to = ["code", "string-literal"]
severity = "warning"

[[rules]]
id = "indent"
check = "indent-step"
exception-step = 6

[[rules]]
id = "trailing"
check = "no-trailing-whitespace"
"#;
        let dto: CatalogueDto = toml::from_str(toml_str).unwrap();
        assert_eq!(dto.rules.len(), 3);
        assert!(matches!(dto.rules[0].check, CheckDto::MaxLineLength { n: 100 }));
        assert_eq!(dto.rules[0].applies_to, vec!["code", "string-literal"]);
        assert_eq!(dto.rules[0].severity, "warning");
        match &dto.rules[1].check {
            CheckDto::IndentStep {
                k,
                exception_step,
                exceptions,
            } => {
                assert_eq!((*k, *exception_step), (2, 6));
                assert_eq!(exceptions, &vec!["do", "case", "let"]);
            }
            other => panic!("unexpected check {other:?}"),
        }
        assert_eq!(dto.rules[2].severity, "error");
        assert!(matches!(dto.rules[2].check, CheckDto::NoTrailingWhitespace));
    }

    #[test]
    fn deserialize_rejects_unknown_family() {
        let result: Result<CatalogueDto, _> = toml::from_str(
            r#"
[[rules]]
id = "x"
check = "max-width"
"#,
        );
        assert!(result.is_err());
    }
}

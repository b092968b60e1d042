//! DTO → Domain model conversion with validation.

use crate::layout::LayoutKind;
use crate::types::Severity;

use super::config_dto::{CatalogueDto, CheckDto, RuleDto};
use super::model::{AppliesTo, CatalogueModel, ModelError, Positive, RuleCheck, RuleDefinition, RuleId};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "rules[0].applies-to").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Cross-entry errors from aggregate root construction.
    #[error("catalogue validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `CatalogueDto` to a validated `CatalogueModel`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: CatalogueDto) -> Result<CatalogueModel, LoadError> {
    let definitions = dto
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i))
        .collect::<Result<Vec<_>, _>>()?;

    CatalogueModel::new(definitions).map_err(LoadError::CrossRef)
}

/// Converts a single rule entry.
///
/// # Errors
///
/// Returns an error if any field fails validation.
pub fn convert_rule(dto: RuleDto, index: usize) -> Result<RuleDefinition, LoadError> {
    let ctx = format!("rules[{index}]");
    let validation = |field: &str| {
        let context = format!("{ctx}.{field}");
        move |source| LoadError::Validation { context, source }
    };

    let id = RuleId::new(&dto.id).map_err(validation("id"))?;
    let ctx = format!("rule '{id}'");
    let severity = parse_severity(&dto.severity, &ctx)?;
    let check = convert_check(dto.check).map_err(validation("check"))?;

    let applies_to = if dto.applies_to.is_empty() {
        AppliesTo::parse(default_kinds(&check))
    } else {
        AppliesTo::parse(dto.applies_to.as_slice())
    }
    .map_err(validation("applies-to"))?;

    RuleDefinition::new(id, applies_to, severity, check).map_err(|source| LoadError::Validation {
        context: ctx,
        source,
    })
}

fn convert_check(dto: CheckDto) -> Result<RuleCheck, ModelError> {
    Ok(match dto {
        CheckDto::MaxLineLength { n } => RuleCheck::MaxLineLength {
            n: Positive::new("n", n)?,
        },
        CheckDto::NoTrailingWhitespace => RuleCheck::NoTrailingWhitespace,
        CheckDto::NoTabs => RuleCheck::NoTabs,
        CheckDto::IndentStep {
            k,
            exception_step,
            exceptions,
        } => RuleCheck::IndentStep {
            k: Positive::new("k", k)?,
            exception_step: Positive::new("exception-step", exception_step)?,
            exceptions: exceptions
                .iter()
                .map(|name| {
                    LayoutKind::parse(name).ok_or_else(|| ModelError::UnknownKind {
                        name: name.clone(),
                    })
                })
                .collect::<Result<_, _>>()?,
        },
        CheckDto::BlankLinesBetweenTopLevel { exactly } => RuleCheck::BlankLinesBetweenTopLevel {
            exactly: usize::try_from(exactly).map_err(|_| ModelError::Negative {
                option: "exactly".to_string(),
                value: exactly,
            })?,
        },
        CheckDto::ImportOrder {
            last,
            reset_on_blank_line,
        } => RuleCheck::ImportOrder {
            last: Some(last).filter(|l| !l.is_empty()),
            reset_on_blank_line,
        },
        CheckDto::NamingCase { abbreviations } => RuleCheck::NamingCase { abbreviations },
        CheckDto::ExportListStructure => RuleCheck::ExportListStructure,
        CheckDto::PragmaPlacement { header_pragmas } => RuleCheck::PragmaPlacement { header_pragmas },
        CheckDto::CommentPlacement { min_gap } => RuleCheck::CommentPlacement {
            min_gap: Positive::new("min-gap", min_gap)?,
        },
        CheckDto::HaddockPresence => RuleCheck::HaddockPresence,
    })
}

/// Kinds a family applies to when `applies-to` is omitted.
#[must_use]
pub fn default_kinds(check: &RuleCheck) -> &'static [&'static str] {
    match check {
        RuleCheck::MaxLineLength { .. } | RuleCheck::NoTrailingWhitespace | RuleCheck::NoTabs => &[
            "code",
            "line-comment",
            "block-comment",
            "string-literal",
            "char-literal",
            "pragma",
            "haddock-comment",
        ],
        RuleCheck::IndentStep { .. } => &["where", "do", "case", "let", "instance", "record", "list"],
        RuleCheck::BlankLinesBetweenTopLevel { .. }
        | RuleCheck::ImportOrder { .. }
        | RuleCheck::NamingCase { .. } => &["code"],
        RuleCheck::ExportListStructure => &["code", "haddock-comment"],
        RuleCheck::HaddockPresence => &["code", "line-comment", "haddock-comment", "pragma"],
        RuleCheck::PragmaPlacement { .. } => &["pragma", "code"],
        RuleCheck::CommentPlacement { .. } => &["line-comment", "haddock-comment"],
    }
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(value).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}

//! Pure domain model for catalogue entries.
//!
//! This module contains no serde and no I/O. All invariants are enforced
//! at construction time via validated newtypes.

use crate::layout::LayoutKind;
use crate::rule::RuleScope;
use crate::span::SpanKind;
use crate::types::Severity;
use std::collections::HashSet;
use std::fmt;

/// Rule ids reserved for scanner and layout recovery diagnostics.
pub const RESERVED_IDS: &[&str] = &[
    "unterminated-comment",
    "unexpected-comment-close",
    "unterminated-string",
    "ambiguous-dedent",
    "unbalanced-delimiter",
];

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated rule id (non-empty, `[a-z0-9-]` only, not reserved).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new rule id.
    ///
    /// # Errors
    ///
    /// Returns error if the id is empty, contains invalid characters or is
    /// reserved for synthetic diagnostics.
    pub fn new(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyRuleId);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ModelError::InvalidRuleId { id: id.to_string() });
        }
        if RESERVED_IDS.contains(&id) {
            return Err(ModelError::ReservedRuleId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive numeric option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Positive(usize);

impl Positive {
    /// Creates a positive value.
    ///
    /// # Errors
    ///
    /// Returns error if `value` is zero or negative.
    pub fn new(option: &str, value: i64) -> Result<Self, ModelError> {
        usize::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
            .ok_or_else(|| ModelError::NotPositive {
                option: option.to_string(),
                value,
            })
    }

    /// Returns the value.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// The span and layout kinds a rule declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliesTo {
    spans: Vec<SpanKind>,
    blocks: Vec<LayoutKind>,
}

impl AppliesTo {
    /// Resolves kind names; each must name a span kind or a layout kind.
    ///
    /// # Errors
    ///
    /// Returns error on the first unknown name.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, ModelError> {
        let mut target = Self::default();
        for name in names {
            let name = name.as_ref();
            if let Some(kind) = SpanKind::parse(name) {
                if !target.spans.contains(&kind) {
                    target.spans.push(kind);
                }
            } else if let Some(kind) = LayoutKind::parse(name) {
                if !target.blocks.contains(&kind) {
                    target.blocks.push(kind);
                }
            } else {
                return Err(ModelError::UnknownKind {
                    name: name.to_string(),
                });
            }
        }
        Ok(target)
    }

    /// Declared span kinds.
    #[must_use]
    pub fn spans(&self) -> &[SpanKind] {
        &self.spans
    }

    /// Declared layout kinds.
    #[must_use]
    pub fn blocks(&self) -> &[LayoutKind] {
        &self.blocks
    }

    /// Kind names in declaration order (spans first).
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.spans
            .iter()
            .map(|k| k.as_str())
            .chain(self.blocks.iter().map(|k| k.as_str()))
            .collect()
    }

    fn check_scope(&self, scope: RuleScope) -> Result<(), String> {
        let tokens = [SpanKind::Code, SpanKind::StringLiteral, SpanKind::CharLiteral];
        match scope {
            RuleScope::Line if self.spans.is_empty() || !self.blocks.is_empty() => {
                Err("line rules apply to span kinds only".to_string())
            }
            RuleScope::Token
                if !self.blocks.is_empty() || !self.spans.iter().any(|k| tokens.contains(k)) =>
            {
                Err("token rules need code, string-literal or char-literal".to_string())
            }
            RuleScope::Block if self.blocks.is_empty() || !self.spans.is_empty() => {
                Err("block rules apply to layout kinds only".to_string())
            }
            RuleScope::Document if self.spans.is_empty() && self.blocks.is_empty() => {
                Err("document rules need at least one kind".to_string())
            }
            _ => Ok(()),
        }
    }
}

// ────────────────────────────────────────────
// Rule families
// ────────────────────────────────────────────

/// Tagged check variant of a catalogue entry, with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCheck {
    /// Lines longer than `n` characters.
    MaxLineLength {
        /// Maximum line width.
        n: Positive,
    },
    /// Spaces or tabs before the end of a line.
    NoTrailingWhitespace,
    /// Tab characters.
    NoTabs,
    /// Block anchors must step `k` columns past the parent anchor.
    IndentStep {
        /// Required step.
        k: Positive,
        /// Alternative step for exception blocks under a binding.
        exception_step: Positive,
        /// Block kinds allowed to use `exception_step`.
        exceptions: Vec<LayoutKind>,
    },
    /// Exact blank-line count between module-level declarations.
    BlankLinesBetweenTopLevel {
        /// Required number of blank lines.
        exactly: usize,
    },
    /// Imports sorted within each import group.
    ImportOrder {
        /// Module that must come last, if any.
        last: Option<String>,
        /// Whether a blank line starts a new sorted section.
        reset_on_blank_line: bool,
    },
    /// Case conventions for declared names.
    NamingCase {
        /// Permitted all-caps abbreviations.
        abbreviations: Vec<String>,
    },
    /// Alignment of the module export list.
    ExportListStructure,
    /// File-header pragmas before the first code token.
    PragmaPlacement {
        /// Pragma names that belong in the file header.
        header_pragmas: Vec<String>,
    },
    /// Minimum gap between code and an end-of-line comment.
    CommentPlacement {
        /// Minimum number of spaces.
        min_gap: Positive,
    },
    /// Module-level declarations carry a Haddock comment.
    HaddockPresence,
}

impl RuleCheck {
    /// Names of all families, as used in `check = "..."`.
    pub const FAMILIES: [&'static str; 11] = [
        "max-line-length",
        "no-trailing-whitespace",
        "no-tabs",
        "indent-step",
        "blank-lines-between-top-level",
        "import-order",
        "naming-case",
        "export-list-structure",
        "pragma-placement",
        "comment-placement",
        "haddock-presence",
    ];

    /// Returns the family name.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Self::MaxLineLength { .. } => "max-line-length",
            Self::NoTrailingWhitespace => "no-trailing-whitespace",
            Self::NoTabs => "no-tabs",
            Self::IndentStep { .. } => "indent-step",
            Self::BlankLinesBetweenTopLevel { .. } => "blank-lines-between-top-level",
            Self::ImportOrder { .. } => "import-order",
            Self::NamingCase { .. } => "naming-case",
            Self::ExportListStructure => "export-list-structure",
            Self::PragmaPlacement { .. } => "pragma-placement",
            Self::CommentPlacement { .. } => "comment-placement",
            Self::HaddockPresence => "haddock-presence",
        }
    }

    /// Returns the dimension the family is evaluated over.
    #[must_use]
    pub fn scope(&self) -> RuleScope {
        match self {
            Self::MaxLineLength { .. } | Self::NoTrailingWhitespace | Self::NoTabs => {
                RuleScope::Line
            }
            Self::NamingCase { .. } => RuleScope::Token,
            Self::IndentStep { .. } => RuleScope::Block,
            Self::BlankLinesBetweenTopLevel { .. }
            | Self::ImportOrder { .. }
            | Self::ExportListStructure
            | Self::PragmaPlacement { .. }
            | Self::CommentPlacement { .. }
            | Self::HaddockPresence => RuleScope::Document,
        }
    }

    /// Span kinds the family reads its input from; all must be declared.
    #[must_use]
    pub fn required_kinds(&self) -> &'static [SpanKind] {
        match self {
            Self::MaxLineLength { .. }
            | Self::NoTrailingWhitespace
            | Self::NoTabs
            | Self::IndentStep { .. }
            | Self::CommentPlacement { .. } => &[],
            Self::NamingCase { .. }
            | Self::BlankLinesBetweenTopLevel { .. }
            | Self::ImportOrder { .. }
            | Self::ExportListStructure => &[SpanKind::Code],
            Self::PragmaPlacement { .. } => &[SpanKind::Code, SpanKind::Pragma],
            Self::HaddockPresence => &[SpanKind::Code, SpanKind::HaddockComment],
        }
    }

    fn check_required(&self, applies_to: &AppliesTo) -> Result<(), String> {
        let missing: Vec<&str> = self
            .required_kinds()
            .iter()
            .filter(|k| !applies_to.spans.contains(*k))
            .map(|k| k.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(format!("applies-to must include {}", missing.join(", ")));
        }
        if matches!(self, Self::CommentPlacement { .. })
            && !applies_to.spans.iter().any(|k| k.is_comment())
        {
            return Err("applies-to must include a comment kind".to_string());
        }
        Ok(())
    }
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// One immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    id: RuleId,
    applies_to: AppliesTo,
    severity: Severity,
    check: RuleCheck,
}

impl RuleDefinition {
    /// Creates a definition, checking that its kinds fit the family scope
    /// and include the kinds the family reads.
    ///
    /// # Errors
    ///
    /// Returns error if the declared kinds are incompatible with the scope
    /// or miss a required kind.
    pub fn new(
        id: RuleId,
        applies_to: AppliesTo,
        severity: Severity,
        check: RuleCheck,
    ) -> Result<Self, ModelError> {
        applies_to
            .check_scope(check.scope())
            .and_then(|()| check.check_required(&applies_to))
            .map_err(|reason| ModelError::IncompatibleKinds {
                id: id.to_string(),
                family: check.family(),
                reason,
            })?;
        Ok(Self {
            id,
            applies_to,
            severity,
            check,
        })
    }

    /// Returns the rule id.
    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// Returns the declared kinds.
    #[must_use]
    pub fn applies_to(&self) -> &AppliesTo {
        &self.applies_to
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the check variant.
    #[must_use]
    pub fn check(&self) -> &RuleCheck {
        &self.check
    }

    /// Returns a copy with another severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated, ordered list of rule definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueModel {
    definitions: Vec<RuleDefinition>,
}

impl CatalogueModel {
    /// Creates a catalogue model, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns one error per duplicated id.
    pub fn new(definitions: Vec<RuleDefinition>) -> Result<Self, Vec<ModelError>> {
        let mut seen = HashSet::new();
        let errors: Vec<ModelError> = definitions
            .iter()
            .filter(|d| !seen.insert(d.id.clone()))
            .map(|d| ModelError::DuplicateRuleId {
                id: d.id.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(Self { definitions })
        } else {
            Err(errors)
        }
    }

    /// Returns the definitions in catalogue order.
    #[must_use]
    pub fn definitions(&self) -> &[RuleDefinition] {
        &self.definitions
    }

    /// Consumes the model into its definitions.
    #[must_use]
    pub fn into_definitions(self) -> Vec<RuleDefinition> {
        self.definitions
    }

    /// Returns true if no rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rule id is empty.
    #[error("rule id must not be empty")]
    EmptyRuleId,

    /// Rule id contains invalid characters.
    #[error("invalid rule id `{id}`: must be [a-z0-9-]")]
    InvalidRuleId {
        /// The invalid id.
        id: String,
    },

    /// Rule id is reserved for synthetic diagnostics.
    #[error("rule id `{id}` is reserved")]
    ReservedRuleId {
        /// The reserved id.
        id: String,
    },

    /// The same id appears twice.
    #[error("duplicate rule id `{id}`")]
    DuplicateRuleId {
        /// The duplicated id.
        id: String,
    },

    /// An `applies-to` entry names no span or layout kind.
    #[error("unknown kind `{name}`")]
    UnknownKind {
        /// The unknown name.
        name: String,
    },

    /// Declared kinds do not fit the family's evaluation scope.
    #[error("rule `{id}` ({family}): {reason}")]
    IncompatibleKinds {
        /// The rule id.
        id: String,
        /// The family name.
        family: &'static str,
        /// What is wrong.
        reason: String,
    },

    /// A numeric option is zero or negative.
    #[error("option `{option}` must be positive, got {value}")]
    NotPositive {
        /// The option name.
        option: String,
        /// The rejected value.
        value: i64,
    },

    /// A numeric option is negative.
    #[error("option `{option}` must not be negative, got {value}")]
    Negative {
        /// The option name.
        option: String,
        /// The rejected value.
        value: i64,
    },
}

//! The rule catalogue: declarative rule definitions bound to rule objects.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! CatalogueModel (pure domain model)
//!   ↓ Catalogue::new(model, factory)
//! Vec<CatalogueEntry>  (definition + RuleBox)
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

use crate::rule::RuleBox;
use model::{CatalogueModel, RuleCheck, RuleDefinition};
use std::fmt;

/// Errors from parsing TOML and loading a catalogue.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content into a validated catalogue model.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_model_from_toml(content: &str) -> Result<CatalogueModel, CatalogueError> {
    let dto: config_dto::CatalogueDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}

/// One catalogue entry: its definition and the rule that implements it.
pub struct CatalogueEntry {
    definition: RuleDefinition,
    rule: RuleBox,
}

impl CatalogueEntry {
    /// Returns the definition.
    #[must_use]
    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    /// Returns the rule object.
    #[must_use]
    pub fn rule(&self) -> &dyn crate::rule::Rule {
        self.rule.as_ref()
    }

    /// Returns the rule id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.definition.id().as_str()
    }
}

impl fmt::Debug for CatalogueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogueEntry")
            .field("definition", &self.definition)
            .field("family", &self.rule.family())
            .finish()
    }
}

/// Ordered, read-only list of rules shared by all document workers.
#[derive(Debug, Default)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Binds every definition of `model` to a rule built by `factory`.
    #[must_use]
    pub fn new(model: CatalogueModel, factory: impl Fn(&RuleCheck) -> RuleBox) -> Self {
        let entries = model
            .into_definitions()
            .into_iter()
            .map(|definition| CatalogueEntry {
                rule: factory(definition.check()),
                definition,
            })
            .collect();
        Self { entries }
    }

    /// Entries in catalogue order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalogue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the entries for which `keep` returns true.
    #[must_use]
    pub fn retain(mut self, keep: impl Fn(&RuleDefinition) -> bool) -> Self {
        self.entries.retain(|e| keep(&e.definition));
        self
    }

    /// Rewrites definitions in place (e.g. severity overrides).
    #[must_use]
    pub fn map_definitions(mut self, f: impl Fn(RuleDefinition) -> RuleDefinition) -> Self {
        self.entries = self
            .entries
            .into_iter()
            .map(|e| CatalogueEntry {
                definition: f(e.definition),
                rule: e.rule,
            })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::types::Severity;

    struct Family(&'static str);

    impl Rule for Family {
        fn family(&self) -> &'static str {
            self.0
        }
    }

    fn factory(check: &RuleCheck) -> RuleBox {
        Box::new(Family(check.family()))
    }

    const TOML: &str = r#"
[[rules]]
id = "line-length"
check = "max-line-length"

[[rules]]
id = "tabs"
check = "no-tabs"
severity = "warning"
"#;

    #[test]
    fn binds_rules_in_order() {
        let catalogue = Catalogue::new(load_model_from_toml(TOML).unwrap(), factory);
        let ids: Vec<&str> = catalogue.entries().iter().map(CatalogueEntry::id).collect();
        assert_eq!(ids, vec!["line-length", "tabs"]);
        assert_eq!(
            catalogue.get("tabs").map(|e| e.rule().family()),
            Some("no-tabs")
        );
    }

    #[test]
    fn retain_and_override() {
        let catalogue = Catalogue::new(load_model_from_toml(TOML).unwrap(), factory)
            .retain(|d| d.id().as_str() != "tabs")
            .map_definitions(|d| d.with_severity(Severity::Info));
        assert_eq!(catalogue.len(), 1);
        assert_eq!(
            catalogue.get("line-length").map(|e| e.definition().severity()),
            Some(Severity::Info)
        );
    }

    #[test]
    fn toml_errors_are_reported() {
        assert!(matches!(
            load_model_from_toml("[[rules]]\nid = 3"),
            Err(CatalogueError::Toml(_))
        ));
    }
}

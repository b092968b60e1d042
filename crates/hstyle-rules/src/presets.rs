//! Rule factory and preset catalogues.

use crate::{
    BlankLinesBetweenTopLevel, CommentPlacement, ExportListStructure, HaddockPresence,
    ImportOrder, IndentStep, MaxLineLength, NamingCase, NoTabs, NoTrailingWhitespace,
    PragmaPlacement,
};
use hstyle_core::catalogue::load_model_from_toml;
use hstyle_core::catalogue::model::{CatalogueModel, RuleCheck};
use hstyle_core::{Catalogue, Config, ConfigError, RuleBox};
use tracing::debug;

/// TOML source of the default catalogue.
pub const DEFAULT_CATALOGUE: &str = include_str!("../catalogue/default.toml");

/// Builds the rule object implementing a check variant.
#[must_use]
pub fn rule_for(check: &RuleCheck) -> RuleBox {
    match check {
        RuleCheck::MaxLineLength { n } => Box::new(MaxLineLength::new(n.get())),
        RuleCheck::NoTrailingWhitespace => Box::new(NoTrailingWhitespace::new()),
        RuleCheck::NoTabs => Box::new(NoTabs::new()),
        RuleCheck::IndentStep {
            k,
            exception_step,
            exceptions,
        } => Box::new(
            IndentStep::new(k.get())
                .exception_step(exception_step.get())
                .exceptions(exceptions.clone()),
        ),
        RuleCheck::BlankLinesBetweenTopLevel { exactly } => {
            Box::new(BlankLinesBetweenTopLevel::new(*exactly))
        }
        RuleCheck::ImportOrder {
            last,
            reset_on_blank_line,
        } => Box::new(
            ImportOrder::new()
                .last(last.clone())
                .reset_on_blank_line(*reset_on_blank_line),
        ),
        RuleCheck::NamingCase { abbreviations } => Box::new(NamingCase::new(abbreviations.clone())),
        RuleCheck::ExportListStructure => Box::new(ExportListStructure::new()),
        RuleCheck::PragmaPlacement { header_pragmas } => {
            Box::new(PragmaPlacement::new(header_pragmas.clone()))
        }
        RuleCheck::CommentPlacement { min_gap } => Box::new(CommentPlacement::new(min_gap.get())),
        RuleCheck::HaddockPresence => Box::new(HaddockPresence::new()),
    }
}

/// Preset catalogues a configuration can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// The bundled default catalogue.
    Default,
    /// No rules; only the configuration's own `[[rules]]`.
    None,
}

impl Preset {
    /// Parses a preset name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the validated catalogue model for this preset.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalogue fails to load.
    pub fn model(self) -> Result<CatalogueModel, ConfigError> {
        match self {
            Self::Default => Ok(load_model_from_toml(DEFAULT_CATALOGUE)?),
            Self::None => Ok(CatalogueModel::default()),
        }
    }
}

/// Returns the catalogue model of the named preset.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] for an unknown name.
pub fn preset_model(name: &str) -> Result<CatalogueModel, ConfigError> {
    Preset::parse(name)
        .ok_or_else(|| ConfigError::UnknownPreset {
            name: name.to_string(),
        })?
        .model()
}

/// Loads the effective catalogue for a configuration: its preset, plus its
/// extra rules, with overrides applied.
///
/// # Errors
///
/// Returns an error if the preset is unknown or any rule or override is
/// invalid.
pub fn load_catalogue(config: &Config) -> Result<Catalogue, ConfigError> {
    let preset = preset_model(config.preset_name())?;
    let model = config.resolve_catalogue(preset)?;
    debug!(
        preset = config.preset_name(),
        rules = model.definitions().len(),
        "Resolved catalogue"
    );
    Ok(Catalogue::new(model, rule_for))
}

/// The default catalogue, bound to its rules.
///
/// # Errors
///
/// Returns an error if the bundled catalogue fails to load.
pub fn default_catalogue() -> Result<Catalogue, ConfigError> {
    Ok(Catalogue::new(Preset::Default.model()?, rule_for))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstyle_core::Severity;

    #[test]
    fn test_default_catalogue_ids() {
        let catalogue = default_catalogue().unwrap();
        let ids: Vec<&str> = catalogue.entries().iter().map(|e| e.id()).collect();
        assert_eq!(
            ids,
            vec![
                "line-length",
                "trailing-whitespace",
                "no-tabs",
                "indent",
                "top-level-spacing",
                "import-order",
                "naming",
                "export-list",
                "pragma-placement",
                "comment-placement",
            ]
        );
        for entry in catalogue.entries() {
            assert_eq!(entry.rule().family(), entry.definition().check().family());
        }
    }

    #[test]
    fn test_every_family_has_a_rule() {
        let toml: String = RuleCheck::FAMILIES
            .iter()
            .map(|family| format!("[[rules]]\nid = \"{family}\"\ncheck = \"{family}\"\n\n"))
            .collect();
        let catalogue = Catalogue::new(load_model_from_toml(&toml).unwrap(), rule_for);
        assert_eq!(catalogue.len(), RuleCheck::FAMILIES.len());
        for entry in catalogue.entries() {
            assert_eq!(entry.rule().family(), entry.id());
        }
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::parse("default"), Some(Preset::Default));
        assert_eq!(Preset::parse("none"), Some(Preset::None));
        assert!(matches!(
            preset_model("strict"),
            Err(ConfigError::UnknownPreset { .. })
        ));
        assert!(preset_model("none").unwrap().is_empty());
    }

    #[test]
    fn test_load_catalogue_with_overrides_and_extra_rules() {
        let config = Config::parse(
            r#"
[overrides.no-tabs]
enabled = false

[overrides.line-length]
severity = "warning"

[[rules]]
id = "docs"
check = "haddock-presence"
"#,
        )
        .unwrap();
        let catalogue = load_catalogue(&config).unwrap();
        assert!(catalogue.get("no-tabs").is_none());
        assert_eq!(
            catalogue.get("line-length").map(|e| e.definition().severity()),
            Some(Severity::Warning)
        );
        assert_eq!(
            catalogue.entries().last().map(|e| e.rule().family()),
            Some("haddock-presence")
        );
    }

    #[test]
    fn test_preset_none_keeps_only_extra_rules() {
        let config = Config::parse(
            "preset = \"none\"\n\n[[rules]]\nid = \"tabs\"\ncheck = \"no-tabs\"\n",
        )
        .unwrap();
        let catalogue = load_catalogue(&config).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert!(catalogue.get("tabs").is_some());
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let config = Config::parse("[overrides.missing]\nenabled = false\n").unwrap();
        assert!(matches!(
            load_catalogue(&config),
            Err(ConfigError::UnknownOverride { .. })
        ));
    }
}

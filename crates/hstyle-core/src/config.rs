//! Configuration types for hstyle.

use crate::catalogue::config_dto::RuleDto;
use crate::catalogue::loader::{self, LoadError};
use crate::catalogue::model::CatalogueModel;
use crate::catalogue::CatalogueError;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration for hstyle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset catalogue to start from ("default" or "none").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing check (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule enable and severity overrides, keyed by rule id.
    #[serde(default)]
    pub overrides: BTreeMap<String, RuleConfig>,

    /// Additional catalogue entries appended to the preset.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Name of the preset catalogue.
    #[must_use]
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or("default")
    }

    /// Severity threshold for a failing check.
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` is not a severity name.
    pub fn fail_on(&self) -> Result<Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(Severity::Error),
            Some(value) => Severity::parse(value).ok_or_else(|| ConfigError::UnknownSeverity {
                value: value.to_string(),
            }),
        }
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.overrides
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.overrides.get(rule_id).and_then(|c| c.severity)
    }

    /// Combines a preset with the extra `[[rules]]` and applies overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra rule is invalid, an id is duplicated, or
    /// an override names an unknown rule.
    pub fn resolve_catalogue(&self, preset: CatalogueModel) -> Result<CatalogueModel, ConfigError> {
        let offset = preset.definitions().len();
        let mut definitions = preset.into_definitions();
        for (i, dto) in self.rules.iter().cloned().enumerate() {
            definitions.push(loader::convert_rule(dto, offset + i).map_err(CatalogueError::from)?);
        }

        for id in self.overrides.keys() {
            if !definitions.iter().any(|d| d.id().as_str() == id) {
                return Err(ConfigError::UnknownOverride { id: id.clone() });
            }
        }

        let definitions = definitions
            .into_iter()
            .filter(|d| self.is_rule_enabled(d.id().as_str()))
            .map(|d| match self.rule_severity(d.id().as_str()) {
                Some(severity) => d.with_severity(severity),
                None => d,
            })
            .collect();

        CatalogueModel::new(definitions)
            .map_err(|errors| ConfigError::Catalogue(CatalogueError::Load(LoadError::CrossRef(errors))))
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// File extensions to check.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Number of parallel document workers.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: default_excludes(),
            extensions: default_extensions(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/dist-newstyle/**".to_string(),
        "**/.stack-work/**".to_string(),
    ]
}

fn default_extensions() -> Vec<String> {
    vec!["hs".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Invalid catalogue entry.
    #[error("Invalid rule catalogue: {0}")]
    Catalogue(#[from] CatalogueError),

    /// Unknown preset name.
    #[error("Unknown preset `{name}`, expected: default, none")]
    UnknownPreset {
        /// The preset name.
        name: String,
    },

    /// Unknown severity name.
    #[error("Unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },

    /// Override for a rule id not in the catalogue.
    #[error("Override for unknown rule `{id}`")]
    UnknownOverride {
        /// The unknown id.
        id: String,
    },
}

//! Core analyzer for orchestrating style checks over a source tree.

use crate::catalogue::Catalogue;
use crate::config::Config;
use crate::evaluator::{evaluate, recovery_violations};
use crate::layout::build_layout;
use crate::reporter::report;
use crate::scanner::scan;
use crate::suppression::Suppressions;
use crate::types::{DocumentReport, LintResult, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error while resolving the root or walking the tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Runs the whole per-document pipeline over one source text.
///
/// Scans, lays out, evaluates every catalogue rule, adds recovery
/// diagnostics, drops suppressed findings and returns the ordered report.
#[must_use]
pub fn lint_source(text: &str, catalogue: &Catalogue) -> Vec<Violation> {
    let scanned = scan(text);
    let layout = build_layout(&scanned.spans);

    let mut violations = evaluate(&scanned.spans, &layout, catalogue);
    violations.extend(recovery_violations(&scanned.errors, &layout.errors));

    let violations = Suppressions::from_spans(&scanned.spans).apply(violations);
    report(violations)
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    catalogue: Option<Catalogue>,
    exclude_patterns: Vec<String>,
    extensions: Vec<String>,
    respect_gitignore: Option<bool>,
    parallelism: Option<usize>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the rule catalogue.
    #[must_use]
    pub fn catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a file extension to check (without the dot).
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Sets whether `.gitignore` files are honoured.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = Some(respect);
        self
    }

    /// Sets the number of document workers.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Sets the configuration.
    ///
    /// Its analyzer settings are merged with the ones given to the builder.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let config = self.config.unwrap_or_default();

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut extensions = self.extensions;
        if extensions.is_empty() {
            extensions.clone_from(&config.analyzer.extensions);
        }

        let catalogue = self.catalogue.unwrap_or_else(|| {
            debug!("No catalogue given, analyzer will report recovery diagnostics only");
            Catalogue::default()
        });

        Ok(Analyzer {
            root,
            catalogue,
            excludes,
            extensions,
            respect_gitignore: self
                .respect_gitignore
                .unwrap_or(config.analyzer.respect_gitignore),
            parallelism: self.parallelism.or(config.analyzer.parallelism),
        })
    }
}

/// The main analyzer that discovers documents and checks them in parallel.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    catalogue: Catalogue,
    excludes: Vec<glob::Pattern>,
    extensions: Vec<String>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the catalogue in use.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Returns the number of catalogue rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.catalogue.len()
    }

    /// Analyzes all discovered documents and returns the results.
    ///
    /// Documents that cannot be read are logged and listed in
    /// [`LintResult::failed`]; they do not stop the others.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails or the worker pool cannot be
    /// built.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes = match self.parallelism {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()?
                .install(|| self.check_all(&files)),
            None => self.check_all(&files),
        };

        let mut result = LintResult::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(violations) => {
                    result.files_checked += 1;
                    result.documents.push(DocumentReport {
                        path: self.display_path(&path),
                        violations,
                    });
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    result.failed.push(self.display_path(&path));
                }
            }
        }
        result.documents.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            "Analysis complete: {} violations in {} files",
            result.violation_count(),
            result.files_checked
        );

        Ok(result)
    }

    fn check_all(&self, files: &[PathBuf]) -> Vec<(PathBuf, std::io::Result<Vec<Violation>>)> {
        files
            .par_iter()
            .map(|path| (path.clone(), self.check_file(path)))
            .collect()
    }

    /// Reads and checks a single document.
    fn check_file(&self, path: &Path) -> std::io::Result<Vec<Violation>> {
        debug!("Analyzing: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let violations = lint_source(&content, &self.catalogue);
        debug!("{}: {} violations", path.display(), violations.len());
        Ok(violations)
    }

    /// Discovers all documents to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .parents(self.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.has_extension(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x == e))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.excludes {
            if pattern.matches(&path_str) {
                return true;
            }

            // Also check as substring for patterns like "**/dist-newstyle/**"
            let normalized_pattern = pattern.as_str().replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }

    /// Path relative to the root, or the path itself when the root is the file.
    fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
    }
}

//! Orchestrates discovery, parsing, walking and reporting across files.

use crate::aggregator::SuppressionRegion;
use crate::comments::CommentIndex;
use crate::config::{Config, ConfigError, SuppressionConfig};
use crate::contents::FileContents;
use crate::parser::SourceParser;
use crate::registry::{CheckPlan, CheckRegistry, CheckSettings};
use crate::suppressions::SuppressionFilter;
use crate::tree::Tree;
use crate::types::{FileError, FileFailure, FileReport, LintResult};
use crate::utils::annotations::suppress_warnings_regions;
use crate::utils::suppress_comments::CommentMarkers;
use crate::walker::TreeWalker;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop an analysis before or outside per-file processing.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error while resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid exclude pattern.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No parser was supplied to the builder.
    #[error("no source parser configured")]
    MissingParser,

    /// The worker pool could not be created.
    #[error("cannot start worker pool: {0}")]
    ThreadPool(String),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    config: Option<Config>,
    parser: Option<Arc<dyn SourceParser>>,
    registry: Option<CheckRegistry>,
    checks: Option<Vec<CheckSettings>>,
    exclude_patterns: Vec<String>,
    suppressions: Vec<SuppressionConfig>,
    parallelism: Option<usize>,
    tab_width: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration. Its `[analyzer]`, `[[check]]` and
    /// `[[suppressions]]` sections apply unless overridden on the builder.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the language front end.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Sets the registry checks are resolved against.
    #[must_use]
    pub fn registry(mut self, registry: CheckRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses these checks instead of the configured `[[check]]` entries.
    #[must_use]
    pub fn checks(mut self, checks: Vec<CheckSettings>) -> Self {
        self.checks = Some(checks);
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

    /// Adds a line-range suppression.
    #[must_use]
    pub fn suppression(mut self, suppression: SuppressionConfig) -> Self {
        self.suppressions.push(suppression);
        self
    }

    /// Number of worker threads; 0 or unset uses one per core.
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Tab width used for reporting columns.
    #[must_use]
    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = Some(width);
        self
    }

    /// Builds the analyzer, validating checks, options and patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing parser, an invalid configuration or an
    /// unresolvable root.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let settings = match self.checks {
            Some(checks) => checks,
            None => config.check_settings()?,
        };
        let registry = self.registry.unwrap_or_default();
        let plan = registry.plan(&settings, parser.token_universe())?;

        let mut suppression_entries = config.suppressions.clone();
        suppression_entries.extend(self.suppressions);
        let suppressions = SuppressionFilter::compile(&suppression_entries)?;

        let markers = config
            .suppression_comments
            .enabled
            .then(|| {
                CommentMarkers::new(
                    config.suppression_comments.off.clone(),
                    config.suppression_comments.on.clone(),
                )
            });

        debug!(
            "Built analyzer: {} checks, {} excludes, {} suppressions",
            plan.len(),
            excludes.len(),
            suppressions.len()
        );

        Ok(Analyzer {
            root,
            parser,
            plan,
            excludes,
            suppressions,
            markers,
            respect_gitignore: config.analyzer.respect_gitignore,
            parallelism: self.parallelism.or(config.analyzer.parallelism),
            tab_width: self
                .tab_width
                .unwrap_or(config.analyzer.tab_width)
                .max(1),
        })
    }
}

/// Runs a validated set of checks over source files.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    parser: Arc<dyn SourceParser>,
    plan: CheckPlan,
    excludes: Vec<glob::Pattern>,
    suppressions: SuppressionFilter,
    markers: Option<CommentMarkers>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
    tab_width: usize,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of configured checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.plan.len()
    }

    /// Names of the configured checks, in registration order.
    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plan.names()
    }

    /// Analyzes every discovered file under the root.
    ///
    /// Per-file failures are collected into [`LintResult::failures`]; the
    /// other files are still checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be created.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());
        let files = self.discover_files();
        info!("Found {} files to analyze", files.len());
        self.analyze_paths(&files)
    }

    /// Analyzes the given files, in parallel.
    ///
    /// Walkers are created per rayon job split, so a worker thread may own
    /// several. Each is used by one file at a time and reset before every
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be created.
    pub fn analyze_paths(&self, files: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism.unwrap_or(0))
            .build()
            .map_err(|e| AnalyzerError::ThreadPool(e.to_string()))?;

        let outcomes: Vec<Result<FileReport, FileFailure>> = pool.install(|| {
            files
                .par_iter()
                .map_init(
                    || self.new_walker(),
                    |walker, path| {
                        let shown_path = self.display_path(path);
                        let outcome = match walker {
                            Ok(walker) => self.analyze_file(walker, path, &shown_path),
                            Err(e) => Err(e.clone()),
                        };
                        outcome.map_err(|e| {
                            warn!("Failed to check {}: {e}", shown_path.display());
                            FileFailure::new(shown_path, e)
                        })
                    },
                )
                .collect()
        });

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => {
                    result.files_checked += 1;
                    result.reports.push(report);
                }
                Err(failure) => result.failures.push(failure),
            }
        }
        result.reports.sort_by(|a, b| a.path.cmp(&b.path));
        result.failures.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            "Analysis complete: {} violations in {} files ({} failed)",
            result.violation_count(),
            result.files_checked,
            result.failures.len()
        );
        Ok(result)
    }

    /// Checks in-memory source as if it were the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the parse or check failure for this source.
    pub fn analyze_source(
        &self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<FileReport, FileError> {
        let mut walker = self.new_walker()?;
        self.check_contents(&mut walker, FileContents::new(path, text))
    }

    fn new_walker(&self) -> Result<TreeWalker, FileError> {
        self.plan
            .instantiate()
            .map(|walker| walker.with_tab_width(self.tab_width))
            .map_err(|e| FileError::Setup(e.to_string()))
    }

    fn analyze_file(
        &self,
        walker: &mut TreeWalker,
        path: &Path,
        shown_path: &Path,
    ) -> Result<FileReport, FileError> {
        debug!("Analyzing: {}", shown_path.display());
        let text = std::fs::read_to_string(path).map_err(|e| FileError::Io(e.to_string()))?;
        self.check_contents(walker, FileContents::new(shown_path, text))
    }

    fn check_contents(
        &self,
        walker: &mut TreeWalker,
        contents: FileContents,
    ) -> Result<FileReport, FileError> {
        let parsed = self.parser.parse(&contents)?;
        let comments = CommentIndex::new(&contents, parsed.comments);
        let aggregator = walker.walk(&parsed.tree, &contents, &comments)?;
        let regions = self.suppression_regions(&contents, &parsed.tree, &comments);
        Ok(FileReport {
            path: contents.path().to_path_buf(),
            violations: aggregator.into_ordered(&regions),
        })
    }

    /// Regions from configuration, comment markers and `@SuppressWarnings`.
    fn suppression_regions(
        &self,
        contents: &FileContents,
        tree: &Tree,
        comments: &CommentIndex<'_>,
    ) -> Vec<SuppressionRegion> {
        let mut regions = self.suppressions.regions_for(contents.path());
        if let Some(markers) = &self.markers {
            regions.extend(markers.regions(comments, contents.line_count()));
        }
        regions.extend(suppress_warnings_regions(tree));
        regions
    }

    /// Paths are reported relative to the root when possible.
    fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Discovers all source files the parser handles.
    fn discover_files(&self) -> Vec<PathBuf> {
        let walker = ignore::WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.into_path();
            if !self.parser.handles(&path) {
                continue;
            }
            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path);
        }
        files.sort();
        files
    }

    /// Checks if a path matches an exclude pattern, either as given or
    /// relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.display_path(path);
        self.excludes
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(&relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, CheckError};
    use crate::comments::CommentSpan;
    use crate::context::CheckContext;
    use crate::options::{CheckOptions, OptionError};
    use crate::parser::{ParseError, ParsedFile};
    use crate::token::TokenType;
    use crate::tree::{Node, Span, TreeBuilder};
    use crate::types::Severity;
    use std::fs;

    /// One `IDENT` per word, one line comment per `//`.
    struct WordParser;

    const WORD_TOKENS: &[TokenType] = &[TokenType::CompilationUnit, TokenType::Ident];

    impl SourceParser for WordParser {
        fn language(&self) -> &'static str {
            "words"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn token_universe(&self) -> &'static [TokenType] {
            WORD_TOKENS
        }

        fn parse(&self, contents: &FileContents) -> Result<ParsedFile, ParseError> {
            let mut builder = TreeBuilder::new();
            let mut comments = Vec::new();
            builder.open(TokenType::CompilationUnit, "", Span::at(1, 0, 0));
            for (index, line) in contents.lines().enumerate() {
                let number = index + 1;
                let (code, comment) = match line.find("//") {
                    Some(at) => (&line[..at], Some((at, &line[at..]))),
                    None => (line, None),
                };
                if code.contains('!') {
                    return Err(ParseError::Syntax {
                        line: number,
                        column: 0,
                        message: "unexpected `!`".to_string(),
                    });
                }
                let mut column = 0;
                for word in code.split(' ') {
                    if !word.is_empty() {
                        builder.leaf(TokenType::Ident, word, Span::at(number, column, word.len()));
                    }
                    column += word.len() + 1;
                }
                if let Some((at, text)) = comment {
                    comments.push(CommentSpan::line(number, at, text));
                }
            }
            builder.close();
            Ok(ParsedFile {
                tree: builder.finish()?,
                comments,
            })
        }
    }

    /// Flags the word `bad`.
    struct NoBad;

    impl Check for NoBad {
        fn name(&self) -> &'static str {
            "no-bad"
        }

        fn code(&self) -> &'static str {
            "T001"
        }

        fn default_tokens(&self) -> &'static [TokenType] {
            &[TokenType::Ident]
        }

        fn messages(&self) -> &'static [(&'static str, &'static str)] {
            &[("bad", "Word '{0}' is not allowed.")]
        }

        fn reset_for_file(&mut self) {}

        fn visit_token(
            &mut self,
            node: Node<'_>,
            ctx: &mut CheckContext<'_>,
        ) -> Result<(), CheckError> {
            if node.text() == "bad" {
                ctx.log(node, "bad", crate::args![node.text()]);
            }
            Ok(())
        }
    }

    fn no_bad(_options: &mut CheckOptions) -> Result<crate::check::CheckBox, OptionError> {
        Ok(Box::new(NoBad))
    }

    fn analyzer(root: &Path, config: Config) -> Analyzer {
        let mut registry = CheckRegistry::new();
        registry.register(no_bad);
        Analyzer::builder()
            .root(root)
            .config(config)
            .parser(WordParser)
            .registry(registry)
            .checks(vec![CheckSettings::named("no-bad")])
            .parallelism(2)
            .build()
            .unwrap()
    }

    #[test]
    fn requires_a_parser() {
        assert!(matches!(
            Analyzer::builder().build(),
            Err(AnalyzerError::MissingParser)
        ));
    }

    #[test]
    fn rejects_unknown_checks() {
        let result = Analyzer::builder()
            .parser(WordParser)
            .checks(vec![CheckSettings::named("missing")])
            .build();
        assert!(matches!(
            result,
            Err(AnalyzerError::Config(ConfigError::UnknownCheck(_)))
        ));
    }

    #[test]
    fn analyzes_directory_and_collects_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "good bad\nbad\n").unwrap();
        fs::write(dir.path().join("b.txt"), "broken!\n").unwrap();
        fs::write(dir.path().join("c.md"), "bad\n").unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build").join("d.txt"), "bad\n").unwrap();

        let result = analyzer(dir.path(), Config::default()).analyze().unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, PathBuf::from("b.txt"));
        assert!(matches!(
            result.failures[0].kind(),
            Some(FileError::Parse(ParseError::Syntax { line: 1, .. }))
        ));

        let violations: Vec<_> = result.violations().collect();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.file, PathBuf::from("a.txt"));
        assert_eq!((violations[0].line(), violations[0].column()), (1, 6));
        assert_eq!(violations[0].message, "Word 'bad' is not allowed.");
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[1].line(), 2);
    }

    #[test]
    fn applies_all_suppression_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse(
            r#"
[[suppressions]]
files = "*.txt"
checks = "no-bad"
lines = "2"
"#,
        )
        .unwrap();
        let analyzer = analyzer(dir.path(), config);

        let report = analyzer
            .analyze_source(
                "x.txt",
                "bad\nbad\n// jstyle:off\nbad\n// jstyle:on\nbad\n",
            )
            .unwrap();
        let lines: Vec<_> = report.violations.iter().map(|v| v.line()).collect();
        assert_eq!(lines, vec![1, 6]);
    }

    #[test]
    fn excludes_match_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer(dir.path(), Config::default());
        assert!(analyzer.should_exclude(&dir.path().join("build/A.txt")));
        assert!(analyzer.should_exclude(&dir.path().join("x/target/A.txt")));
        assert!(!analyzer.should_exclude(&dir.path().join("src/A.txt")));
    }
}

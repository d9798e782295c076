//! Source loading: directory walk, exclusion and parsing.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::extractor::{FileAnalysis, LanguageExtractor};
use crate::types::SkippedFile;

/// Directories pruned along with the default exclusions.
const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules", "testdata"];

/// Version-control metadata, never walked.
const VCS_DIR: &str = ".git";

/// Errors that abort loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The directory walk failed.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// A discovered file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// An exclusion pattern is not a valid glob.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Glob compile error.
        source: glob::PatternError,
    },

    /// The worker pool could not be created.
    #[error("failed to start parser pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// An exclusion rule: glob when the pattern has wildcards, substring otherwise.
#[derive(Debug)]
enum Exclude {
    Glob(glob::Pattern),
    Substring(String),
}

impl Exclude {
    fn parse(pattern: &str) -> Result<Self, LoadError> {
        if pattern.contains(['*', '?', '[']) {
            glob::Pattern::new(pattern)
                .map(Self::Glob)
                .map_err(|e| LoadError::Pattern {
                    pattern: pattern.to_string(),
                    source: e,
                })
        } else {
            Ok(Self::Substring(pattern.to_string()))
        }
    }

    fn matches(&self, rel: &str) -> bool {
        match self {
            Self::Glob(p) => p.matches(rel),
            Self::Substring(s) => !s.is_empty() && rel.contains(s.as_str()),
        }
    }
}

/// Files that were parsed, plus those that were skipped.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successful analyses, sorted by path.
    pub analyses: Vec<FileAnalysis>,
    /// Files that failed to parse.
    pub skipped: Vec<SkippedFile>,
}

enum FileOutcome {
    Parsed(FileAnalysis),
    Skipped(SkippedFile),
    Generated,
}

/// Walks a directory tree and parses every eligible source file.
pub struct SourceLoader<'a> {
    root: PathBuf,
    extractor: &'a dyn LanguageExtractor,
    excludes: Vec<Exclude>,
    skipped_dirs: &'static [&'static str],
    respect_gitignore: bool,
    parallelism: usize,
}

impl<'a> SourceLoader<'a> {
    /// Creates a loader with the extractor's default exclusions. Vendored
    /// and `testdata` directories are pruned.
    ///
    /// # Errors
    ///
    /// Returns an error if a default exclusion is not a valid glob.
    pub fn new(root: impl Into<PathBuf>, extractor: &'a dyn LanguageExtractor) -> Result<Self, LoadError> {
        let excludes = extractor
            .default_excludes()
            .iter()
            .map(|p| Exclude::parse(p))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            root: root.into(),
            extractor,
            excludes,
            skipped_dirs: SKIPPED_DIRS,
            respect_gitignore: true,
            parallelism: 1,
        })
    }

    /// Creates a loader without any default exclusions. Only `.git` is
    /// pruned.
    #[must_use]
    pub fn bare(root: impl Into<PathBuf>, extractor: &'a dyn LanguageExtractor) -> Self {
        Self {
            root: root.into(),
            extractor,
            excludes: Vec::new(),
            skipped_dirs: &[],
            respect_gitignore: true,
            parallelism: 1,
        }
    }

    /// Adds exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for p in patterns {
            self.excludes.push(Exclude::parse(p.as_ref())?);
        }
        Ok(self)
    }

    /// Sets whether `.gitignore` files are honoured.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets the number of parser workers. `0` and `1` mean sequential.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers.max(1);
        self
    }

    /// Returns the root directory being loaded.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a root-relative path is excluded.
    #[must_use]
    pub fn is_excluded(&self, rel: &str) -> bool {
        self.excludes.iter().any(|e| e.matches(rel))
    }

    /// Lists eligible source files, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        let skipped_dirs = self.skipped_dirs;
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|n| n == VCS_DIR || skipped_dirs.contains(&n)))
            });

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.extractor.handles(path) {
                continue;
            }

            let rel = relative(&self.root, path);
            if self.is_excluded(&rel.to_string_lossy()) {
                debug!("Excluding: {}", rel.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Discovers and parses every eligible file.
    ///
    /// Parse failures are logged and recorded as skipped; IO failures abort.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk or a file read fails.
    pub fn load(&self) -> Result<LoadOutcome, LoadError> {
        let files = self.discover()?;
        debug!(
            "Parsing {} {} files with {} worker(s)",
            files.len(),
            self.extractor.language_id(),
            self.parallelism
        );

        let results: Vec<Result<FileOutcome, LoadError>> = if self.parallelism > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.parallelism)
                .build()?;
            pool.install(|| files.par_iter().map(|f| self.parse_file(f)).collect())
        } else {
            files.iter().map(|f| self.parse_file(f)).collect()
        };

        let mut outcome = LoadOutcome::default();
        for result in results {
            match result? {
                FileOutcome::Parsed(analysis) => outcome.analyses.push(analysis),
                FileOutcome::Skipped(skipped) => outcome.skipped.push(skipped),
                FileOutcome::Generated => {}
            }
        }
        Ok(outcome)
    }

    fn parse_file(&self, path: &Path) -> Result<FileOutcome, LoadError> {
        let rel = relative(&self.root, path);
        debug!("Analyzing: {}", rel.display());

        let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if self.extractor.is_generated(&source) {
            debug!("Skipping generated file: {}", rel.display());
            return Ok(FileOutcome::Generated);
        }

        match self.extractor.analyze(&source) {
            Ok(mut analysis) => {
                analysis.file_path = rel;
                Ok(FileOutcome::Parsed(analysis))
            }
            Err(e) => {
                warn!("Failed to parse {}: {}", rel.display(), e);
                Ok(FileOutcome::Skipped(SkippedFile {
                    path: rel,
                    reason: e.to_string(),
                }))
            }
        }
    }
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExtractError, ImportInfo};
    use std::fs;
    use tempfile::TempDir;

    /// Treats every line starting with `import ` as an import; `!` marks a syntax error.
    struct LineExtractor;

    impl LanguageExtractor for LineExtractor {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[".src"]
        }

        fn default_excludes(&self) -> &'static [&'static str] {
            &["*_test.src"]
        }

        fn is_generated(&self, source: &str) -> bool {
            source.starts_with("// generated")
        }

        fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
            if source.contains('!') {
                return Err(ExtractError::Syntax { line: 1, column: 1 });
            }
            let imports = source
                .lines()
                .enumerate()
                .filter_map(|(i, l)| {
                    l.strip_prefix("import ").map(|p| ImportInfo {
                        line: i + 1,
                        column: 1,
                        path: p.to_string(),
                        alias: None,
                    })
                })
                .collect();
            Ok(FileAnalysis {
                imports,
                ..FileAnalysis::default()
            })
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "domain/user.src", "import shared\n");
        write(tmp.path(), "domain/user_test.src", "import testing\n");
        write(tmp.path(), "app/broken.src", "import !\n");
        write(tmp.path(), "app/gen.src", "// generated\nimport x\n");
        write(tmp.path(), "vendor/lib/lib.src", "import y\n");
        write(tmp.path(), "docs/readme.md", "not source\n");
        tmp
    }

    #[test]
    fn discovers_eligible_files_only() {
        let tmp = fixture();
        let loader = SourceLoader::new(tmp.path(), &LineExtractor).unwrap();
        let files: Vec<PathBuf> = loader
            .discover()
            .unwrap()
            .iter()
            .map(|p| relative(tmp.path(), p))
            .collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("app/broken.src"),
                PathBuf::from("app/gen.src"),
                PathBuf::from("domain/user.src"),
            ]
        );
    }

    #[test]
    fn parse_failures_are_skipped_not_fatal() {
        let tmp = fixture();
        let outcome = SourceLoader::new(tmp.path(), &LineExtractor)
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(outcome.analyses.len(), 1);
        assert_eq!(outcome.analyses[0].file_path, PathBuf::from("domain/user.src"));
        assert_eq!(outcome.analyses[0].imports[0].path, "shared");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, PathBuf::from("app/broken.src"));
        assert!(outcome.skipped[0].reason.contains("syntax error"));
    }

    #[test]
    fn user_excludes_apply_as_glob_or_substring() {
        let tmp = fixture();
        let loader = SourceLoader::new(tmp.path(), &LineExtractor)
            .unwrap()
            .with_excludes(["app/"])
            .unwrap();
        assert!(loader.is_excluded("app/broken.src"));
        assert!(!loader.is_excluded("domain/user.src"));

        let loader = SourceLoader::bare(tmp.path(), &LineExtractor)
            .with_excludes(["**/user*.src"])
            .unwrap();
        assert!(loader.is_excluded("domain/user.src"));
        assert!(!loader.is_excluded("app/gen.src"));
    }

    #[test]
    fn bare_loader_keeps_test_files() {
        let tmp = fixture();
        let files = SourceLoader::bare(tmp.path(), &LineExtractor)
            .discover()
            .unwrap();
        assert!(files.iter().any(|p| p.ends_with("domain/user_test.src")));
    }

    #[test]
    fn vendor_is_pruned_only_with_default_excludes() {
        let tmp = fixture();
        write(tmp.path(), ".git/hooks/hook.src", "import z\n");
        let vendored = |files: &[PathBuf]| files.iter().any(|p| p.ends_with("vendor/lib/lib.src"));

        let defaults = SourceLoader::new(tmp.path(), &LineExtractor)
            .unwrap()
            .discover()
            .unwrap();
        assert!(!vendored(&defaults));

        let bare = SourceLoader::bare(tmp.path(), &LineExtractor)
            .respect_gitignore(false)
            .discover()
            .unwrap();
        assert!(vendored(&bare));
        assert!(!bare.iter().any(|p| p.ends_with(".git/hooks/hook.src")));
    }

    #[test]
    fn parallel_load_matches_sequential() {
        let tmp = fixture();
        for i in 0..8 {
            write(tmp.path(), &format!("pkg{i}/f.src"), &format!("import dep{i}\n"));
        }
        let sequential = SourceLoader::new(tmp.path(), &LineExtractor)
            .unwrap()
            .load()
            .unwrap();
        let parallel = SourceLoader::new(tmp.path(), &LineExtractor)
            .unwrap()
            .parallelism(4)
            .load()
            .unwrap();
        let paths = |o: &LoadOutcome| {
            o.analyses
                .iter()
                .map(|a| a.file_path.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(paths(&sequential), paths(&parallel));
        assert_eq!(sequential.skipped, parallel.skipped);
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let loader = SourceLoader::new(tmp.path().join("missing"), &LineExtractor).unwrap();
        assert!(loader.load().is_err());
    }
}

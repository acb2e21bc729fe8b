//! Per-test configuration and the output-root configuration source.
//!
//! A [`TestConfig`] is built once per test class, is immutable from then on,
//! and may be shared freely between sessions. The corpus deliberately has no
//! default: choosing one decides whether results are publicly visible, and
//! that decision belongs to the test owner, not to this crate.

use std::env;
use std::path::{Path, PathBuf};

use strum_macros::Display;
use tracing::info;

/// Environment variable carrying the output-root override. The external test
/// runner parses its own `--render-test-output-dir` style switch and surfaces
/// the value here; this crate only reads it.
pub const OUTPUT_DIR_ENV: &str = "RENDER_TEST_OUTPUT_DIR";

/// The closed set of corpora golden images can be uploaded into.
///
/// A corpus is a named bucket in the diffing service that separates result
/// visibility and ownership. Keeping the set closed catches typos at
/// construction time instead of at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Corpus {
    /// General-use corpus with publicly visible results.
    Public,
    /// General-use corpus with internal-only results.
    Internal,
    /// Corpus for virtual-reality features.
    Vr,
}

impl Corpus {
    /// The id the diffing service knows this bucket by.
    pub fn as_gold_id(&self) -> &'static str {
        match self {
            Self::Public => "android-render-tests",
            Self::Internal => "android-render-tests-internal",
            Self::Vr => "android-vr-render-tests",
        }
    }
}

/// Immutable configuration shared by every capture in a render-test session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    corpus: Corpus,
    revision: u32,
    description: String,
    fail_on_unsupported_configs: bool,
}

impl TestConfig {
    /// Starts a fresh builder with nothing selected.
    pub fn builder() -> TestConfigBuilder {
        TestConfigBuilder::new()
    }

    /// The corpus results are uploaded into.
    pub fn corpus(&self) -> Corpus {
        self.corpus
    }

    /// The revision appended to every golden name.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Optional human-readable note shown alongside results; empty when unset.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether failures are still reported on hardware/software combinations
    /// without maintained baselines.
    pub fn fail_on_unsupported_configs(&self) -> bool {
        self.fail_on_unsupported_configs
    }
}

/// Fluent builder for [`TestConfig`].
///
/// Each corpus/description combination costs some per-run initialization on
/// the upload host, so prefer reusing one configuration across a test class
/// over minting unique descriptions everywhere.
#[derive(Debug, Default)]
pub struct TestConfigBuilder {
    corpus: Option<Corpus>,
    revision: u32,
    description: String,
    fail_on_unsupported_configs: bool,
}

impl TestConfigBuilder {
    /// Empty builder; a corpus still has to be selected before `build()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a builder that already selected [`Corpus::Public`].
    pub fn with_public_corpus() -> Self {
        Self::new().corpus(Corpus::Public)
    }

    /// Selects the corpus results belong to. Required.
    pub fn corpus(mut self, corpus: Corpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Sets the revision reported with every golden. Increment it whenever
    /// output changes enough that previous baselines should be considered
    /// invalid, e.g. a UI rework. Defaults to 0.
    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Sets the optional description shown alongside the images in the Gold
    /// web UI, e.g. why the revision was incremented. Defaults to empty.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets whether failures should still be reported on unsupported
    /// hardware/software configurations. Defaults to false.
    pub fn fail_on_unsupported_configs(mut self, fail: bool) -> Self {
        self.fail_on_unsupported_configs = fail;
        self
    }

    /// Finalizes the configuration.
    ///
    /// # Panics
    ///
    /// Panics when no corpus was selected. That is a configuration error and
    /// fails fast, before any test runs.
    pub fn build(self) -> TestConfig {
        let Some(corpus) = self.corpus else {
            panic!("a corpus must be selected so test owners explicitly decide result visibility");
        };
        TestConfig {
            corpus,
            revision: self.revision,
            description: self.description,
            fail_on_unsupported_configs: self.fail_on_unsupported_configs,
        }
    }
}

/// Resolves the root directory golden artifacts are written under.
///
/// Resolution order: the explicit override, then [`OUTPUT_DIR_ENV`], then a
/// fixed directory under the system temp dir so the harness works out of the
/// box. All artifacts land in a `skia_gold/` directory below the returned
/// root.
pub fn resolve_output_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }

    match env::var_os(OUTPUT_DIR_ENV) {
        Some(dir) if !dir.is_empty() => {
            let root = PathBuf::from(dir);
            info!(root = %root.display(), "Using output root from {}", OUTPUT_DIR_ENV);
            root
        }
        _ => {
            let root = env::temp_dir().join("render_gold");
            info!(root = %root.display(), "No output root configured, using temp fallback");
            root
        }
    }
}

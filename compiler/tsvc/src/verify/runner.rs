//! Verification engine.
//!
//! Runs every fragment of a corpus through the type checker and matcher and
//! collects the results into a [`Report`].

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tsv_fragment::{
    discover_fragments_in, extract_markers, CheckOptions, Discovery, Fragment, FragmentPath,
};

use super::matching::match_markers;
use super::report::{FragmentReport, Report};
use super::xfail::XFailSet;
use crate::adapter::{SharedContext, TypeChecker};

/// Lines above the anchor a diagnostic may sit and still satisfy a marker.
pub const DEFAULT_TOLERANCE: u32 = 2;

/// Configuration for the verifier.
#[derive(Clone, Debug)]
pub struct VerifyConfig {
    /// Only verify fragments whose path contains this substring.
    pub filter: Option<String>,
    /// Run fragments in parallel.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub jobs: Option<usize>,
    /// Preceding-line window for the matcher.
    pub tolerance: u32,
    /// Compiler options applied to every fragment before its own directives.
    pub options: CheckOptions,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            filter: None,
            parallel: true,
            jobs: None,
            tolerance: DEFAULT_TOLERANCE,
            options: CheckOptions::defaults(),
        }
    }
}

/// Fragment verifier.
///
/// Holds no mutable state: each fragment is loaded, checked and matched
/// independently, so any number of them can run at once.
pub struct Verifier<C> {
    config: VerifyConfig,
    checker: C,
    shared: SharedContext,
    xfail: XFailSet,
}

impl<C: TypeChecker> Verifier<C> {
    pub fn new(checker: C) -> Self {
        Verifier::with_config(checker, VerifyConfig::default())
    }

    pub fn with_config(checker: C, config: VerifyConfig) -> Self {
        Verifier {
            config,
            checker,
            shared: SharedContext::empty(),
            xfail: XFailSet::empty(),
        }
    }

    #[must_use]
    pub fn with_shared(mut self, shared: SharedContext) -> Self {
        self.shared = shared;
        self
    }

    #[must_use]
    pub fn with_xfail(mut self, xfail: XFailSet) -> Self {
        self.xfail = xfail;
        self
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Verify all fragments in a path (file or directory).
    ///
    /// Parts of the tree that could not be read are reported as fatal
    /// entries after the fragments, whatever the filter.
    pub fn run(&self, path: &Path) -> Report {
        let Discovery {
            mut fragments,
            errors,
        } = discover_fragments_in(path);
        if let Some(filter) = &self.config.filter {
            fragments.retain(|f| f.path.to_string_lossy().contains(filter.as_str()));
        }
        tracing::debug!(
            checker = self.checker.name(),
            count = fragments.len(),
            unreadable = errors.len(),
            parallel = self.config.parallel,
            "verifying fragments"
        );
        let mut report = self.run_fragments(&fragments);
        for error in errors {
            report.add_fragment(FragmentReport::fatal(error.path.clone(), vec![error.to_string()]));
        }
        report
    }

    /// Verify an explicit list of fragments, reporting in list order.
    pub fn run_fragments(&self, fragments: &[FragmentPath]) -> Report {
        let start = Instant::now();
        let indexed = if self.config.parallel && fragments.len() > 1 {
            self.run_parallel(fragments)
        } else {
            self.run_sequential(fragments)
        };
        let mut report = Report::collect(indexed);
        report.duration = start.elapsed();
        report
    }

    fn run_sequential(&self, fragments: &[FragmentPath]) -> Vec<(usize, FragmentReport)> {
        fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| (index, self.run_file(&fragment.path)))
            .collect()
    }

    /// Run fragments on a scoped rayon thread pool.
    ///
    /// `build_scoped` guarantees the pool is torn down before returning,
    /// avoiding the atexit hang of the global pool. Results complete in any
    /// order; each carries its input index for [`Report::collect`].
    fn run_parallel(&self, fragments: &[FragmentPath]) -> Vec<(usize, FragmentReport)> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = self.config.jobs {
            builder = builder.num_threads(jobs);
        }
        builder
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    fragments
                        .par_iter()
                        .enumerate()
                        .map(|(index, fragment)| (index, self.run_file(&fragment.path)))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                self.run_sequential(fragments)
            })
    }

    /// Load and verify one fragment file.
    fn run_file(&self, path: &Path) -> FragmentReport {
        let mut report = match Fragment::load(path) {
            Ok(fragment) => self.verify_fragment(&fragment),
            Err(e) => FragmentReport::fatal(path.to_path_buf(), vec![e.to_string()]),
        };
        report.expected_failure = self.xfail.is_expected(path);
        report
    }

    /// Verify one loaded fragment.
    pub fn verify_fragment(&self, fragment: &Fragment) -> FragmentReport {
        let _span = tracing::debug_span!("fragment", path = %fragment.path().display()).entered();
        let start = Instant::now();

        let markers = extract_markers(fragment);
        let mut errors: Vec<String> = markers.errors.iter().map(ToString::to_string).collect();

        let options = self.config.options.merged(fragment.options());
        tracing::debug!(checker = self.checker.name(), markers = markers.markers.len(), "checking");
        let diagnostics = match self.checker.check(fragment, &options, &self.shared) {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                tracing::debug!(error = %e, "adapter failed");
                errors.push(e.to_string());
                return FragmentReport::fatal(fragment.path().to_path_buf(), errors)
                    .with_duration(start.elapsed());
            }
        };

        let matched = match_markers(&markers.markers, diagnostics, self.config.tolerance);
        let report = FragmentReport::from_match(fragment.path().to_path_buf(), matched, errors)
            .with_duration(start.elapsed());
        tracing::debug!(verdict = %report.verdict, "verified");
        report
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

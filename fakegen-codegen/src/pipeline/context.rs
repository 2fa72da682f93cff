//! Compilation context passed through pipeline phases.

use std::path::PathBuf;

use fakegen_ir::DeclarationAnalysis;
use fakegen_manifest::Manifest;
use indexmap::IndexMap;

use super::diagnostic::{Diagnostic, Severity};
use crate::{cache::GenerationCache, document::GeneratedCodeDocument, session::AnalysisSession};

/// Context passed through all pipeline phases.
///
/// This struct carries the state of compilation through each phase,
/// accumulating results and diagnostics along the way. Maps are keyed by
/// qualified declaration name and keep manifest order.
#[derive(Debug)]
pub struct CompilationContext {
    /// The original manifest being compiled.
    pub manifest: Manifest,
    /// Memoization and shapes for this run (populated by AnalyzePhase).
    pub session: AnalysisSession,
    /// One analysis per fakeable declaration (populated by AnalyzePhase).
    pub analyses: IndexMap<String, DeclarationAnalysis>,
    /// Fingerprints of every analysis (populated by BuildPhase).
    pub fingerprints: IndexMap<String, u64>,
    /// Documents for declarations that need generating (populated by BuildPhase).
    pub documents: IndexMap<String, GeneratedCodeDocument>,
    /// Declarations skipped because their cached output is current.
    pub cached: Vec<String>,
    /// Output directory whose generation cache the build consults.
    pub cache_dir: Option<PathBuf>,
    /// The loaded generation cache (populated by BuildPhase when caching).
    pub cache: Option<GenerationCache>,
    /// Diagnostics collected during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    /// Create a new compilation context from a manifest.
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            session: AnalysisSession::new(),
            analyses: IndexMap::new(),
            fingerprints: IndexMap::new(),
            documents: IndexMap::new(),
            cached: Vec::new(),
            cache_dir: None,
            cache: None,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics of one severity, in the order they were recorded.
    pub fn diagnostics_with(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics_with(Severity::Error).count()
    }
}

//! Pipeline snapshot plugin for visualization and debugging.
//!
//! This module provides a plugin that captures the pipeline state after each phase,
//! enabling visualization of the compilation process.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use eyre::{Result, WrapErr};
use fakegen_ir::{DeclarationAnalysis, GenericPattern};
use serde::Serialize;

use super::{CompilationContext, Diagnostic, Plugin};
use crate::document::{BehaviorSummary, GeneratedCodeDocument};

/// The parts of a generated document worth looking at between phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub declaration: String,
    pub file_stem: String,
    pub pattern: GenericPattern,
    pub behaviors: Vec<BehaviorSummary>,
}

impl From<&GeneratedCodeDocument> for DocumentSummary {
    fn from(document: &GeneratedCodeDocument) -> Self {
        Self {
            declaration: document.qualified_name(),
            file_stem: document.file_stem.clone(),
            pattern: document.pattern,
            behaviors: document.summary.clone(),
        }
    }
}

/// A snapshot of the pipeline state at a specific phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSnapshot {
    /// The phase that just completed.
    pub phase: String,

    /// Declaration analyses (available after "analyze" phase).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub analyses: Vec<DeclarationAnalysis>,

    /// Built documents (available after "build" phase).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentSummary>,

    /// Declarations skipped as cache hits.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cached: Vec<String>,

    /// Diagnostics collected so far.
    pub diagnostics: Vec<Diagnostic>,
}

/// A plugin that captures pipeline state after each phase.
///
/// Use this plugin with the `--visualize` flag to output intermediate
/// representations for debugging and understanding the pipeline.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new().plugin(SnapshotPlugin::with_output_dir(".fakegen/debug"));
/// let ctx = pipeline.run(manifest)?;
/// ```
pub struct SnapshotPlugin {
    /// Collected snapshots.
    snapshots: RwLock<Vec<PhaseSnapshot>>,
    /// Output directory for snapshots.
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    /// Create a new snapshot plugin.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: None,
        }
    }

    /// Create a new snapshot plugin that writes to a directory.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// Get all collected snapshots.
    pub fn snapshots(&self) -> Vec<PhaseSnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write all snapshots to a directory, one `<phase>.json` per phase.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        for snapshot in self
            .snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            write_snapshot(dir, snapshot)?;
        }
        Ok(())
    }

    fn capture_snapshot(&self, phase: &str, ctx: &CompilationContext) -> PhaseSnapshot {
        let snapshot = PhaseSnapshot {
            phase: phase.to_string(),
            analyses: ctx.analyses.values().cloned().collect(),
            documents: ctx.documents.values().map(DocumentSummary::from).collect(),
            cached: ctx.cached.clone(),
            diagnostics: ctx.diagnostics.clone(),
        };
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
        snapshot
    }
}

fn write_snapshot(dir: &Path, snapshot: &PhaseSnapshot) -> Result<()> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.json", snapshot.phase));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

impl Default for SnapshotPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        let snapshot = self.capture_snapshot(phase, ctx);

        // If output directory is configured, write immediately
        if let Some(ref dir) = self.output_dir {
            write_snapshot(dir, &snapshot)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fakegen_manifest::Manifest;
    use tempfile::TempDir;

    use super::*;
    use crate::pipeline::Pipeline;

    const MANIFEST: &str = r#"
        [project]
        name = "test"

        [[declarations]]
        name = "Clock"
        package = "com.example"

        [[declarations.members]]
        kind = "property"
        name = "now"
        type = "Long"
    "#;

    #[test]
    fn test_snapshot_plugin_creation() {
        let plugin = SnapshotPlugin::new();
        assert!(plugin.snapshots().is_empty());
    }

    #[test]
    fn test_snapshots_written_per_phase() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::from_str(MANIFEST).unwrap();

        Pipeline::new()
            .plugin(SnapshotPlugin::with_output_dir(dir.path()))
            .run(manifest)
            .unwrap();

        for phase in ["validate", "analyze", "build"] {
            assert!(dir.path().join(format!("{phase}.json")).exists(), "{phase}");
        }
        let build = fs::read_to_string(dir.path().join("build.json")).unwrap();
        assert!(build.contains("\"file_stem\": \"FakeClockImpl\""));
    }
}

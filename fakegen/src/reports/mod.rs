//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod bake;
mod check;
mod explain;
mod output;

pub use bake::{BakeReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use check::CheckReport;
pub use explain::{BehaviorInfo, DeclarationInfo, ExplainReport, LintInfo, ManifestInfo, PhaseInfo};
pub use output::{Report, TerminalOutput};

#[cfg(test)]
pub(crate) use output::testing;

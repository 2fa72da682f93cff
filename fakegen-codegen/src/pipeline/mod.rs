//! Compilation pipeline for fake generation.
//!
//! This module provides a [`Pipeline`] orchestrator that manages the compilation
//! phases from a parsed manifest to generated code documents. The pipeline provides:
//!
//! - Explicit phase boundaries (validate → analyze → build)
//! - Plugin hooks for extensibility (before/after each phase)
//! - Unified diagnostics collection
//! - One [`AnalysisSession`](crate::session::AnalysisSession) per run, owned by
//!   the [`CompilationContext`]
//!
//! # Example
//!
//! ```ignore
//! use fakegen_codegen::pipeline::Pipeline;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//!
//! for diag in ctx.diagnostics_with(Severity::Warning) {
//!     eprintln!("{diag}");
//! }
//!
//! let generator = KotlinGenerator::from_context(ctx);
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;
mod snapshot;

pub use context::CompilationContext;
pub use diagnostic::{Diagnostic, Severity, declaration_location, member_location};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use snapshot::{DocumentSummary, PhaseSnapshot, SnapshotPlugin};

//! Built-in pipeline phases.
//!
//! This module provides the standard phases that run in every pipeline:
//!
//! - [`ValidatePhase`] - runs lints over the manifest and collects diagnostics
//! - [`AnalyzePhase`] - resolves shapes and analyzes every declaration
//! - [`BuildPhase`] - builds one generated code document per declaration

mod analyze;
mod build;
mod validate;

pub use analyze::AnalyzePhase;
pub use build::BuildPhase;
pub use validate::{
    EmptyDeclarationLint, FakeableShapeLint, Lint, LintInfo, MemberModifiersLint,
    NameCollisionLint, TypeParametersLint, ValidatePhase,
};

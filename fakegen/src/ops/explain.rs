//! Explain operation - how each declaration will be faked.

use std::path::Path;

use eyre::{Context, Result, eyre};
use fakegen_codegen::pipeline::{Pipeline, phases::ValidatePhase};
use fakegen_ir::TargetKind;
use fakegen_manifest::Manifest;

use crate::reports::{
    BehaviorInfo, DeclarationInfo, ExplainReport, LintInfo, ManifestInfo, PhaseInfo,
};

/// Execute the explain operation.
///
/// Runs the pipeline without the generation cache and describes the generic
/// pattern and per-behavior strategies of every declaration, or of the one
/// named by `declaration`.
pub fn explain(
    manifest: &Manifest,
    config_path: &Path,
    declaration: Option<&str>,
) -> Result<ExplainReport> {
    let filter = match declaration {
        Some(name) => Some(
            manifest
                .declaration(name)
                .ok_or_else(|| eyre!("no declaration named '{}' in the manifest", name))?
                .qualified_name(),
        ),
        None => None,
    };

    let pipeline = Pipeline::new();
    let validate_phase = ValidatePhase::new();

    let phases: Vec<PhaseInfo> = pipeline
        .phase_info()
        .into_iter()
        .map(|p| PhaseInfo {
            name: p.name.to_string(),
            description: p.description.to_string(),
        })
        .collect();

    let lints: Vec<LintInfo> = validate_phase
        .lint_info()
        .into_iter()
        .map(|l| LintInfo {
            name: l.name.to_string(),
            description: l.description.to_string(),
        })
        .collect();

    let ctx = pipeline.run(manifest.clone()).wrap_err("Pipeline failed")?;

    let declarations: Vec<DeclarationInfo> = ctx
        .documents
        .iter()
        .filter(|(qualified, _)| filter.as_deref().is_none_or(|f| f == qualified.as_str()))
        .map(|(qualified, document)| {
            let target = match ctx.analyses.get(qualified).map(|a| a.target) {
                Some(TargetKind::Class) => "class (extends)",
                _ => "interface (implements)",
            };
            DeclarationInfo {
                name: qualified.clone(),
                target: target.to_string(),
                pattern: document.pattern.to_string(),
                fake: document.implementation.name.clone(),
                behaviors: document
                    .summary
                    .iter()
                    .map(|b| BehaviorInfo {
                        name: b.behavior.clone(),
                        scoping: b.scoping.to_string(),
                        default: b.default.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(ExplainReport {
        config_path: config_path.to_path_buf(),
        manifest: ManifestInfo {
            name: manifest.project.name.clone(),
            output: manifest.project.output.display().to_string(),
            declaration_count: manifest.declarations.len(),
        },
        phases,
        lints,
        declarations,
    })
}

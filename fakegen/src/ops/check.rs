//! Check operation - manifest validation.

use std::path::Path;

use fakegen_codegen::pipeline::{Pipeline, Severity};
use eyre::{Context, Result};
use fakegen_manifest::Manifest;

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs validation and analysis and collects every diagnostic.
pub fn check(manifest: &Manifest, config_path: &Path) -> Result<CheckReport> {
    let ctx = Pipeline::new()
        .check(manifest.clone())
        .wrap_err("Validation failed")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &ctx.diagnostics {
        let msg = if let Some(loc) = &diag.location {
            format!("{}\n  --> {}", diag.message, loc)
        } else {
            diag.message.clone()
        };

        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        declaration_count: ctx.analyses.len(),
        errors,
        warnings,
        infos,
    })
}

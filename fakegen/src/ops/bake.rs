//! Bake operation - fake generation from manifest.

use std::path::Path;

use eyre::{Context, Result};
use fakegen_codegen::{
    cache::CACHE_DIR,
    language::LanguageCodegen,
    pipeline::{Pipeline, Severity, SnapshotPlugin},
};
use fakegen_codegen_kotlin::Generator;
use fakegen_manifest::Manifest;
use tracing::info;

use crate::reports::{BakeReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};

/// Options for the bake operation.
pub struct BakeOptions<'a> {
    /// Output directory for generated code.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Whether to output debug snapshots.
    pub visualize: bool,
    /// Whether to skip declarations whose output is up to date.
    pub use_cache: bool,
}

/// Execute the bake operation.
///
/// Runs the pipeline on the manifest and renders every built document to Kotlin.
pub fn bake(manifest: &Manifest, opts: BakeOptions) -> Result<BakeReport> {
    let debug_dir = opts.output_dir.join(CACHE_DIR).join("debug");

    let mut pipeline = Pipeline::new();
    if opts.visualize {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(&debug_dir));
    }
    // A preview always shows every file.
    if opts.use_cache && !opts.dry_run {
        pipeline = pipeline.cache(opts.output_dir);
    }
    let ctx = pipeline.run(manifest.clone()).wrap_err("Pipeline failed")?;

    let warnings: Vec<String> = ctx
        .diagnostics_with(Severity::Warning)
        .map(|d| match &d.location {
            Some(loc) => format!("{} (at {})", d.message, loc),
            None => d.message.clone(),
        })
        .collect();
    let declaration_count = ctx.analyses.len();

    let generator = Generator::from_context(ctx);
    let result = if opts.dry_run {
        let files = generator
            .preview()
            .into_iter()
            .map(|f| PreviewFile {
                path: f.path,
                content: f.content,
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let generated = generator
            .generate(opts.output_dir)
            .wrap_err("Failed to generate code")?;
        info!(
            language = generator.language(),
            written = generated.written.len(),
            unchanged = generated.unchanged.len(),
            cached = generated.cached.len(),
            "generation finished"
        );

        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            written: generated.written,
            unchanged: generated.unchanged,
            cached: generated.cached,
            debug_dir: opts.visualize.then_some(debug_dir),
        })
    };

    Ok(BakeReport {
        project_name: manifest.project.name.clone(),
        declaration_count,
        warnings,
        result,
    })
}

//! Bake command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct BakeReport {
    /// Project name from manifest.
    pub project_name: String,

    /// Number of declarations analyzed, cached ones included.
    pub declaration_count: usize,

    /// Warning messages from pipeline.
    pub warnings: Vec<String>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Files created or rewritten, relative to the output directory.
    pub written: Vec<String>,
    /// Files whose content was already up to date.
    pub unchanged: Vec<String>,
    /// Declarations skipped by the generation cache.
    pub cached: Vec<String>,
    /// Path to debug snapshots, if visualization was enabled.
    pub debug_dir: Option<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// File path.
    pub path: String,
    /// File content.
    pub content: String,
}

impl Report for BakeReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl BakeReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(debug_dir) = &written.debug_dir {
            out.key_value(
                "Pipeline snapshots written to",
                &debug_dir.display().to_string(),
            );
            out.newline();
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        out.preformatted(&format!(
            "{} ({} declarations)",
            self.project_name, self.declaration_count
        ));
        out.newline();

        if !written.written.is_empty() {
            out.section("Written");
            for file in &written.written {
                out.added_item(file);
            }
            out.newline();
        }

        if !written.cached.is_empty() {
            out.section("Up to date (cached)");
            for name in &written.cached {
                out.list_item(name);
            }
            out.newline();
        }

        out.key_value(
            "Generated",
            &format!(
                "{} ({} written, {} unchanged)",
                written.output_dir.display(),
                written.written.len(),
                written.unchanged.len()
            ),
        );
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}

//! Explain command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from pipeline explanation.
#[derive(Debug)]
pub struct ExplainReport {
    /// Path to the manifest file.
    pub config_path: PathBuf,
    /// Manifest information.
    pub manifest: ManifestInfo,
    /// Pipeline phases.
    pub phases: Vec<PhaseInfo>,
    /// Validation lints.
    pub lints: Vec<LintInfo>,
    /// Generation decisions per declaration.
    pub declarations: Vec<DeclarationInfo>,
}

/// Information extracted from the manifest.
#[derive(Debug)]
pub struct ManifestInfo {
    /// Project name.
    pub name: String,
    /// Configured output directory.
    pub output: String,
    /// Number of declarations listed.
    pub declaration_count: usize,
}

/// Information about a pipeline phase.
#[derive(Debug)]
pub struct PhaseInfo {
    pub name: String,
    pub description: String,
}

/// Information about a validation lint.
#[derive(Debug)]
pub struct LintInfo {
    pub name: String,
    pub description: String,
}

/// How one declaration is faked.
#[derive(Debug)]
pub struct DeclarationInfo {
    /// Qualified declaration name.
    pub name: String,
    /// How the fake relates to its target.
    pub target: String,
    /// Generic pattern label.
    pub pattern: String,
    /// Name of the implementation class.
    pub fake: String,
    pub behaviors: Vec<BehaviorInfo>,
}

/// Strategies picked for one configurable behavior.
#[derive(Debug)]
pub struct BehaviorInfo {
    pub name: String,
    pub scoping: String,
    pub default: String,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("Fakegen Pipeline Explanation");
        out.newline();

        out.key_value("Input", &self.config_path.display().to_string());
        out.key_value_indented("Project", &self.manifest.name);
        out.key_value_indented("Output", &self.manifest.output);
        out.key_value_indented("Declarations", &self.manifest.declaration_count.to_string());
        out.newline();

        out.section("Pipeline Phases");
        for (i, phase) in self.phases.iter().enumerate() {
            out.numbered_item(i + 1, &format!("{} - {}", phase.name, phase.description));
        }
        out.newline();

        out.section("Validation Lints");
        for lint in &self.lints {
            out.list_item(&format!("{}: {}", lint.name, lint.description));
        }

        for declaration in &self.declarations {
            out.newline();
            out.section(&declaration.name);
            out.key_value_indented("Fake", &declaration.fake);
            out.key_value_indented("Target", &declaration.target);
            out.key_value_indented("Generics", &declaration.pattern);
            for behavior in &declaration.behaviors {
                out.list_item(&format!(
                    "{}: {} scoping, {} default",
                    behavior.name, behavior.scoping, behavior.default
                ));
            }
        }
    }
}

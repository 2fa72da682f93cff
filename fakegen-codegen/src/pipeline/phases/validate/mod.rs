//! Validate phase - runs lints on the manifest.

mod lint;
pub mod lints;

use eyre::{Result, bail};
pub use lint::{Lint, LintInfo};
pub use lints::{
    EmptyDeclarationLint, FakeableShapeLint, MemberModifiersLint, NameCollisionLint,
    TypeParametersLint,
};

use tracing::debug;

use crate::pipeline::{CompilationContext, Phase};

/// Phase that validates the manifest using configurable lints.
///
/// Later phases assume every declaration passed this phase, so any error
/// stops the pipeline here.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// Create a new validate phase with default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![
                Box::new(FakeableShapeLint),
                Box::new(MemberModifiersLint),
                Box::new(TypeParametersLint),
                Box::new(NameCollisionLint),
                Box::new(EmptyDeclarationLint),
            ],
        }
    }

    /// Create a validate phase with no lints.
    pub fn empty() -> Self {
        Self { lints: Vec::new() }
    }

    /// Add a custom lint to the validation phase.
    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    /// Get the names of all lints that will be run.
    pub fn lint_names(&self) -> Vec<&'static str> {
        self.lints.iter().map(|l| l.name()).collect()
    }

    /// Get information about all lints that will be run.
    pub fn lint_info(&self) -> Vec<LintInfo> {
        self.lints.iter().map(|l| l.info()).collect()
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check that every declaration can be faked and collect diagnostics"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        for lint in &self.lints {
            let before = ctx.diagnostics.len();
            lint.check(&ctx.manifest, &mut ctx.diagnostics);
            debug!(lint = lint.name(), found = ctx.diagnostics.len() - before, "lint checked");
        }

        // Warnings and infos pass.
        if ctx.has_errors() {
            bail!("Validation failed with {} error(s)", ctx.error_count());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fakegen_manifest::Manifest;

    use super::*;
    use crate::pipeline::{Diagnostic, Severity};

    fn parse_manifest(content: &str) -> Manifest {
        Manifest::from_str(content).expect("Failed to parse test manifest")
    }

    fn make_test_manifest() -> Manifest {
        parse_manifest(
            r#"
            [project]
            name = "test"
        "#,
        )
    }

    #[test]
    fn test_default_lints() {
        assert_eq!(
            ValidatePhase::new().lint_names(),
            [
                "fakeable-shape",
                "member-modifiers",
                "type-parameters",
                "name-collision",
                "empty-declaration"
            ]
        );
        assert!(ValidatePhase::empty().lint_info().is_empty());
    }

    #[test]
    fn test_with_errors() {
        struct AlwaysErrorLint;
        impl Lint for AlwaysErrorLint {
            fn name(&self) -> &'static str {
                "always-error"
            }
            fn description(&self) -> &'static str {
                "Always produces an error"
            }
            fn check(&self, _manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
                diagnostics.push(Diagnostic::error("test", "forced error"));
            }
        }

        let mut ctx = CompilationContext::new(make_test_manifest());

        let phase = ValidatePhase::empty().with_lint(AlwaysErrorLint);
        let result = phase.run(&mut ctx);

        assert!(result.is_err());
        assert!(ctx.has_errors());
    }

    #[test]
    fn test_warnings_allowed() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Marker"
        "#,
        );

        let mut ctx = CompilationContext::new(manifest);

        let phase = ValidatePhase::empty().with_lint(EmptyDeclarationLint);
        let result = phase.run(&mut ctx);

        assert!(result.is_ok());
        assert!(ctx.diagnostics_with(Severity::Warning).next().is_some());
        assert!(!ctx.has_errors());
    }
}

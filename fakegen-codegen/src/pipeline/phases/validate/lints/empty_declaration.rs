//! Lint for declarations with nothing to fake.

use fakegen_manifest::Manifest;

use super::{super::Lint, target_of};
use crate::{
    analysis::Exclusion,
    pipeline::{Diagnostic, declaration_location},
};

/// Lint that warns when a declaration has no members a fake would override.
///
/// The fake still compiles, but its factory and DSL are empty.
pub struct EmptyDeclarationLint;

impl Lint for EmptyDeclarationLint {
    fn name(&self) -> &'static str {
        "empty-declaration"
    }

    fn description(&self) -> &'static str {
        "Warn about declarations without members to fake"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for declaration in &manifest.declarations {
            if !declaration.kind.is_fakeable() {
                continue;
            }
            let target = target_of(declaration);
            let fakeable = declaration
                .members
                .iter()
                .filter(|m| Exclusion::of(m, target).is_none())
                .count();
            if fakeable == 0 {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!("'{}' has no members to fake", declaration.name()),
                    )
                    .at(declaration_location(declaration.name())),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{super::parse_manifest, *};

    #[test]
    fn test_declaration_with_members() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Api"

            [[declarations.members]]
            kind = "function"
            name = "ping"
        "#,
        );

        let mut diagnostics = Vec::new();
        EmptyDeclarationLint.check(&manifest, &mut diagnostics);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_only_inherited_or_final_members() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Api"

            [[declarations.members]]
            kind = "function"
            name = "toString"
            returns = "String"
            origin = "inherited"

            [[declarations]]
            name = "Base"
            kind = "open-class"

            [[declarations.members]]
            kind = "function"
            name = "close"
        "#,
        );

        let mut diagnostics = Vec::new();
        EmptyDeclarationLint.check(&manifest, &mut diagnostics);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.severity.is_warning()));
        assert_eq!(diagnostics[1].location.as_deref(), Some("declarations.Base"));
    }
}

//! Lint for declaration kinds that cannot be faked.

use fakegen_manifest::{DeclarationKind, Manifest};

use super::super::Lint;
use crate::pipeline::{Diagnostic, declaration_location};

/// Lint that errors on sealed, final, object and enum declarations.
///
/// A fake must implement or extend its target from another file, which
/// none of these kinds allow.
pub struct FakeableShapeLint;

impl Lint for FakeableShapeLint {
    fn name(&self) -> &'static str {
        "fakeable-shape"
    }

    fn description(&self) -> &'static str {
        "Reject declarations that cannot be implemented or extended"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for declaration in &manifest.declarations {
            if declaration.kind.is_fakeable() {
                continue;
            }
            diagnostics.push(
                Diagnostic::error(
                    "validate",
                    format!(
                        "cannot fake {} '{}': {}",
                        declaration.kind.as_str(),
                        declaration.name(),
                        reason(declaration.kind)
                    ),
                )
                .at(declaration_location(declaration.name())),
            );
        }
    }
}

fn reason(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::SealedInterface | DeclarationKind::SealedClass => {
            "sealed hierarchies are closed to other files"
        }
        DeclarationKind::FinalClass => "final classes cannot be extended",
        DeclarationKind::Object => "objects are singletons",
        DeclarationKind::EnumClass => "enum entries are fixed",
        _ => "unsupported declaration kind",
    }
}

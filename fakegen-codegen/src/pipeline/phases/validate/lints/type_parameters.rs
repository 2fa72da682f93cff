//! Lint for type parameter declarations.

use std::collections::HashSet;

use fakegen_manifest::{Manifest, MemberKind, MemberOrigin, TypeParameterDef};

use super::super::Lint;
use crate::pipeline::{Diagnostic, declaration_location, member_location};

/// Lint that checks type parameter lists.
///
/// A method-level parameter that shadows a class-level one is legal Kotlin
/// but would be erased in storage while the class-level one is preserved,
/// so the fake's configuration would not mean what it appears to.
pub struct TypeParametersLint;

impl Lint for TypeParametersLint {
    fn name(&self) -> &'static str {
        "type-parameters"
    }

    fn description(&self) -> &'static str {
        "Check type parameter names are unique and not shadowed"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for declaration in &manifest.declarations {
            if !declaration.kind.is_fakeable() {
                continue;
            }
            check_duplicates(
                &declaration.type_parameters,
                &declaration_location(declaration.name()),
                diagnostics,
            );

            let class_names: HashSet<&str> = declaration
                .type_parameters
                .iter()
                .map(|p| p.name.get_ref().as_str())
                .collect();

            for member in &declaration.members {
                if member.origin != MemberOrigin::Declared || member.type_parameters.is_empty() {
                    continue;
                }
                let location = member_location(declaration.name(), member.name());

                if member.kind == MemberKind::Property {
                    diagnostics.push(
                        Diagnostic::error(
                            "validate",
                            format!("property '{}' cannot declare type parameters", member.name()),
                        )
                        .at(location),
                    );
                    continue;
                }

                check_duplicates(&member.type_parameters, &location, diagnostics);
                for param in &member.type_parameters {
                    let name = param.name.get_ref();
                    if class_names.contains(name.as_str()) {
                        diagnostics.push(
                            Diagnostic::warning(
                                "validate",
                                format!(
                                    "type parameter '{name}' of '{}' shadows the class type parameter",
                                    member.name()
                                ),
                            )
                            .at(location.clone()),
                        );
                    }
                }
            }
        }
    }
}

fn check_duplicates(params: &[TypeParameterDef], location: &str, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for param in params {
        let name = param.name.get_ref();
        if !seen.insert(name.as_str()) {
            diagnostics.push(
                Diagnostic::error("validate", format!("duplicate type parameter '{name}'"))
                    .at(location),
            );
        }
    }
}

//! Lint for member modifiers a fake cannot honor.

use fakegen_ir::TargetKind;
use fakegen_manifest::{DeclarationDef, Manifest, MemberDef, MemberKind, MemberOrigin, Modifier};

use super::{super::Lint, target_of};
use crate::pipeline::{Diagnostic, member_location};

/// Lint that checks modifier combinations on declared members.
///
/// Errors block generation. Members of class targets that are not
/// overridable produce an info diagnostic, since they are skipped.
pub struct MemberModifiersLint;

impl Lint for MemberModifiersLint {
    fn name(&self) -> &'static str {
        "member-modifiers"
    }

    fn description(&self) -> &'static str {
        "Check member modifiers are valid and overridable"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for declaration in &manifest.declarations {
            if !declaration.kind.is_fakeable() {
                continue;
            }
            for member in &declaration.members {
                if member.origin == MemberOrigin::Declared {
                    check_member(declaration, member, diagnostics);
                }
            }
        }
    }
}

fn check_member(declaration: &DeclarationDef, member: &MemberDef, diagnostics: &mut Vec<Diagnostic>) {
    let location = member_location(declaration.name(), member.name());
    let mut error = |message: String| {
        diagnostics.push(Diagnostic::error("validate", message).at(location.clone()));
    };
    let name = member.name();

    for unknown in member.unknown_modifiers() {
        error(format!("unknown modifier '{}' on '{name}'", unknown.get_ref()));
    }

    if member.has_modifier(Modifier::Inline) {
        error(format!("inline member '{name}' cannot be overridden"));
    }
    if let Some(param) = member.type_parameters.iter().find(|p| p.reified) {
        error(format!(
            "reified type parameter '{}' on '{name}' requires an inline member",
            param.name.get_ref()
        ));
    }

    if member.kind == MemberKind::Property {
        for modifier in [Modifier::Suspend, Modifier::Operator] {
            if member.has_modifier(modifier) {
                error(format!(
                    "property '{name}' cannot be {}",
                    keyword(modifier)
                ));
            }
        }
        if member.receiver.is_some() {
            error(format!("extension property '{name}' is not supported"));
        }
    }

    let is_final = member.has_modifier(Modifier::Final);
    let is_abstract = member.has_modifier(Modifier::Abstract);
    let is_open = member.has_modifier(Modifier::Open);
    if is_abstract && (is_open || is_final) {
        let other = if is_open { "open" } else { "final" };
        error(format!("'{name}' cannot be both abstract and {other}"));
    } else if is_open && is_final {
        error(format!("'{name}' cannot be both open and final"));
    }

    if member.parameters.iter().filter(|p| p.vararg).count() > 1 {
        error(format!("'{name}' declares more than one vararg parameter"));
    }

    if target_of(declaration) == TargetKind::Class {
        if is_open && !is_abstract && member.receiver.is_some() {
            diagnostics.push(
                Diagnostic::warning(
                    "validate",
                    format!(
                        "open extension member '{name}' will not fall back to its implementation"
                    ),
                )
                .at(location.clone()),
            );
        }
        if !is_open && !is_abstract {
            diagnostics.push(
                Diagnostic::info(
                    "validate",
                    format!("'{name}' is not overridable and is inherited unchanged"),
                )
                .at(location),
            );
        }
    }
}

fn keyword(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Suspend => "suspend",
        Modifier::Operator => "operator",
        Modifier::Abstract => "abstract",
        Modifier::Open => "open",
        Modifier::Final => "final",
        Modifier::Infix => "infix",
        Modifier::Inline => "inline",
        Modifier::Override => "override",
    }
}

//! Lint for members that map to the same generated names.

use std::collections::HashMap;

use fakegen_manifest::{DeclarationDef, Manifest, MemberKind};

use super::{super::Lint, target_of};
use crate::{
    analysis::Exclusion,
    naming::MemberNames,
    pipeline::{Diagnostic, member_location},
};

const SLOTS: [&str; 5] = [
    "behavior field",
    "call counter",
    "call counter",
    "configure method",
    "DSL method",
];

/// Lint that errors when two behaviors would share a generated identifier.
///
/// The implementation class and the configuration DSL are joined by name,
/// so overloads and names differing only in the case of their first letter
/// cannot both be faked.
pub struct NameCollisionLint;

impl Lint for NameCollisionLint {
    fn name(&self) -> &'static str {
        "name-collision"
    }

    fn description(&self) -> &'static str {
        "Detect members that generate the same behavior, counter or DSL names"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for declaration in &manifest.declarations {
            if declaration.kind.is_fakeable() {
                check_declaration(declaration, diagnostics);
            }
        }
    }
}

fn check_declaration(declaration: &DeclarationDef, diagnostics: &mut Vec<Diagnostic>) {
    let target = target_of(declaration);
    // (slot, generated name) -> behavior that claimed it
    let mut claimed: HashMap<(usize, String), String> = HashMap::new();

    for member in &declaration.members {
        if Exclusion::of(member, target).is_some() {
            continue;
        }
        let mut behaviors = vec![(member.name().to_string(), MemberNames::new(member.name()))];
        if member.kind == MemberKind::Property && member.mutable {
            behaviors.push((
                format!("{} (setter)", member.name()),
                MemberNames::setter(member.name()),
            ));
        }

        for (behavior, names) in behaviors {
            for (slot, generated) in names.all().into_iter().enumerate() {
                match claimed.get(&(slot, generated.to_string())) {
                    Some(first) => {
                        diagnostics.push(
                            Diagnostic::error(
                                "validate",
                                format!(
                                    "'{behavior}' and '{first}' both generate {} '{generated}'",
                                    SLOTS[slot]
                                ),
                            )
                            .at(member_location(declaration.name(), member.name())),
                        );
                        // One diagnostic per colliding pair
                        break;
                    }
                    None => {
                        claimed.insert((slot, generated.to_string()), behavior.clone());
                    }
                }
            }
        }
    }
}

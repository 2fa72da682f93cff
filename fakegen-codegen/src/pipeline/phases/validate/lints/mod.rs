//! Built-in lints for manifest validation.

mod empty_declaration;
mod fakeable_shape;
mod member_modifiers;
mod name_collision;
mod type_parameters;

pub use empty_declaration::EmptyDeclarationLint;
pub use fakeable_shape::FakeableShapeLint;
pub use member_modifiers::MemberModifiersLint;
pub use name_collision::NameCollisionLint;
pub use type_parameters::TypeParametersLint;

use fakegen_ir::TargetKind;
use fakegen_manifest::DeclarationDef;

/// How a declaration's fake relates to it.
fn target_of(declaration: &DeclarationDef) -> TargetKind {
    if declaration.kind.is_interface_like() {
        TargetKind::Interface
    } else {
        TargetKind::Class
    }
}

#[cfg(test)]
pub(crate) fn parse_manifest(content: &str) -> fakegen_manifest::Manifest {
    use std::str::FromStr;
    fakegen_manifest::Manifest::from_str(content).expect("Failed to parse test manifest")
}

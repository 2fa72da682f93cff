//! Declaration analysis: name resolution and the Member Analyzer.

mod builtins;
mod member;
mod resolve;

pub use builtins::{builtin_package, primitive_array};
use fakegen_ir::{DataShape, ShapeCatalog, ShapeField};
use fakegen_manifest::Manifest;
pub use member::{Exclusion, MemberAnalyzer};
pub use resolve::{NameResolver, Scope};

/// Resolve every `[[shapes]]` entry of a manifest into a [`ShapeCatalog`].
///
/// Field types see the shape's own type parameters, the built-ins, the other
/// shapes and the shape's package.
pub fn build_shapes(manifest: &Manifest) -> ShapeCatalog {
    // Field types may reference other shapes, so names are known up front.
    let names: ShapeCatalog = manifest
        .shapes
        .iter()
        .map(|shape| DataShape {
            name: shape.name().to_string(),
            package: shape.package.clone(),
            type_parameters: shape.type_parameters.clone(),
            fields: Vec::new(),
        })
        .collect();
    let resolver = NameResolver::new(&names);

    manifest
        .shapes
        .iter()
        .map(|shape| {
            let scope = Scope {
                package: &shape.package,
                imports: &[],
                class_parameters: &shape.type_parameters,
                method_parameters: &[],
            };
            DataShape {
                name: shape.name().to_string(),
                package: shape.package.clone(),
                type_parameters: shape.type_parameters.clone(),
                fields: shape
                    .fields
                    .iter()
                    .map(|field| ShapeField {
                        name: field.name.get_ref().clone(),
                        ty: resolver.resolve(field.ty.expr(), &scope),
                    })
                    .collect(),
            }
        })
        .collect()
}

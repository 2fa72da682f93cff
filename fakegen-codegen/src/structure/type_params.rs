//! Type parameter lists shared by generated headers.

use fakegen_ir::TypeParameterDescriptor;

use crate::{document::TypeParameterList, render::TypeRenderer};

/// Render a type parameter list.
///
/// Bounds go inline while every parameter has at most one; as soon as one
/// parameter has several, all bounds move to the `where` clause. Variance is
/// never rendered: behavior storage uses the parameters invariantly.
pub fn type_parameter_list(
    renderer: &TypeRenderer<'_>,
    params: &[TypeParameterDescriptor],
) -> TypeParameterList {
    if params.is_empty() {
        return TypeParameterList::default();
    }

    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let arguments = format!("<{}>", names.join(", "));

    if params.iter().any(|p| p.bounds.len() > 1) {
        let constraints: Vec<String> = params
            .iter()
            .flat_map(|p| {
                p.bounds
                    .iter()
                    .map(move |b| format!("{} : {}", p.name, renderer.render_bound(b)))
            })
            .collect();
        return TypeParameterList {
            declaration: arguments.clone(),
            arguments,
            where_clause: Some(constraints.join(", ")),
        };
    }

    let inline: Vec<String> = params
        .iter()
        .map(|p| renderer.render_parameter_inline(p))
        .collect();
    TypeParameterList {
        declaration: format!("<{}>", inline.join(", ")),
        arguments,
        where_clause: None,
    }
}

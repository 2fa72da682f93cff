//! Name resolution for manifest type expressions.
//!
//! Resolution order for a written name:
//! 1. type parameters in scope (method scope before class scope)
//! 2. explicit imports of the declaration
//! 3. Kotlin built-ins
//! 4. known data shapes, by unique simple name
//! 5. the declaration's own package
//!
//! A name that starts with a lowercase package segment is taken as fully
//! qualified. Nothing else is guessed.

use fakegen_ir::{
    Classifier, ClassifierOrigin, FunctionType, ResolvedType, ShapeCatalog, TypeArgument,
    TypeKind, TypeParameterScope, Variance,
};
use fakegen_manifest::syntax::{Projection, TypeArg, TypeExpr};

use super::builtins::builtin_package;

/// Names visible at a resolution site.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub package: &'a str,
    pub imports: &'a [String],
    pub class_parameters: &'a [String],
    pub method_parameters: &'a [String],
}

impl<'a> Scope<'a> {
    /// The same scope with method-level parameters in view.
    pub fn with_method_parameters(self, method_parameters: &'a [String]) -> Self {
        Self {
            method_parameters,
            ..self
        }
    }
}

/// Resolves type expressions against a [`Scope`] and the known shapes.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    shapes: &'a ShapeCatalog,
}

impl<'a> NameResolver<'a> {
    pub fn new(shapes: &'a ShapeCatalog) -> Self {
        Self { shapes }
    }

    /// Resolve a type expression. Never fails; unknown names degrade to
    /// unresolved classifiers.
    pub fn resolve(&self, expr: &TypeExpr, scope: &Scope<'_>) -> ResolvedType {
        match expr {
            TypeExpr::Named(named) => {
                if let Some(scope_tag) = type_parameter_scope(&named.name, scope) {
                    return ResolvedType::new(
                        TypeKind::TypeParameter {
                            name: named.name.clone(),
                            scope: scope_tag,
                        },
                        named.nullable,
                    );
                }
                let arguments = named
                    .arguments
                    .iter()
                    .map(|arg| match arg {
                        TypeArg::Star => TypeArgument::Star,
                        TypeArg::Type { projection, ty } => TypeArgument::Type {
                            variance: match projection {
                                Projection::None => Variance::Invariant,
                                Projection::Out => Variance::Covariant,
                                Projection::In => Variance::Contravariant,
                            },
                            ty: self.resolve(ty, scope),
                        },
                    })
                    .collect();
                ResolvedType::new(
                    TypeKind::Class {
                        classifier: self.classifier(&named.name, scope),
                        arguments,
                    },
                    named.nullable,
                )
            }
            TypeExpr::Function(function) => ResolvedType::new(
                TypeKind::Function(FunctionType {
                    receiver: function
                        .receiver
                        .as_ref()
                        .map(|r| Box::new(self.resolve(r, scope))),
                    parameters: function
                        .parameters
                        .iter()
                        .map(|p| self.resolve(p, scope))
                        .collect(),
                    return_type: Box::new(self.resolve(&function.returns, scope)),
                    is_suspend: function.suspend,
                }),
                function.nullable,
            ),
        }
    }

    /// Resolve a class name.
    pub fn classifier(&self, name: &str, scope: &Scope<'_>) -> Classifier {
        if is_qualified(name) {
            return self.qualified(name);
        }

        let outer = name.split('.').next().unwrap_or(name);
        if let Some(import) = scope
            .imports
            .iter()
            .find(|import| import.rsplit('.').next() == Some(outer))
        {
            let package = import
                .rsplit_once('.')
                .map(|(package, _)| package)
                .unwrap_or_default();
            let qualified = format!("{package}.{name}");
            let origin = if self.shapes.get(&qualified).is_some() {
                ClassifierOrigin::Shape
            } else {
                ClassifierOrigin::Imported
            };
            return Classifier::new(package, name, origin);
        }

        if let Some(package) = builtin_package(name) {
            return Classifier::builtin(package, name);
        }

        if let Some(shape) = self.shapes.find_simple(name) {
            return Classifier::new(&shape.package, &shape.name, ClassifierOrigin::Shape);
        }

        if !scope.package.is_empty() {
            let qualified = format!("{}.{}", scope.package, name);
            let origin = if self.shapes.get(&qualified).is_some() {
                ClassifierOrigin::Shape
            } else {
                ClassifierOrigin::SamePackage
            };
            return Classifier::new(scope.package, name, origin);
        }

        Classifier::unresolved(name)
    }

    fn qualified(&self, name: &str) -> Classifier {
        let segments: Vec<&str> = name.split('.').collect();
        let split = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_uppercase()))
            .unwrap_or(segments.len() - 1)
            .max(1);
        let package = segments[..split].join(".");
        let simple = segments[split..].join(".");

        let origin = if self.shapes.get(name).is_some() {
            ClassifierOrigin::Shape
        } else if builtin_package(&simple) == Some(package.as_str()) {
            ClassifierOrigin::Builtin
        } else {
            ClassifierOrigin::Qualified
        };
        Classifier::new(package, simple, origin)
    }
}

fn type_parameter_scope(name: &str, scope: &Scope<'_>) -> Option<TypeParameterScope> {
    if scope.method_parameters.iter().any(|p| p == name) {
        Some(TypeParameterScope::Method)
    } else if scope.class_parameters.iter().any(|p| p == name) {
        Some(TypeParameterScope::Class)
    } else {
        None
    }
}

/// Whether a written name starts with a package segment (`com.example.User`).
fn is_qualified(name: &str) -> bool {
    name.contains('.') && name.starts_with(|c: char| c.is_lowercase())
}

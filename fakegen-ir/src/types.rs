//! Resolved type occurrences.
//!
//! A [`ResolvedType`] describes one occurrence of a type in a member
//! signature after the front end resolved every name. Equality and hashing
//! are structural; the [`OccurrenceId`] only identifies the occurrence for
//! memoization and never takes part in comparisons.

use std::{
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU32, Ordering},
};

use serde::Serialize;

use crate::params::{TypeParameterScope, Variance};

/// Identity of a single type occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceId(u32);

impl OccurrenceId {
    /// Allocate a new, never reused occurrence id.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Where a classifier name was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierOrigin {
    /// Kotlin standard library or kotlinx.coroutines built-in.
    Builtin,
    /// A data shape known to the front end.
    Shape,
    /// Named in the declaration's explicit imports.
    Imported,
    /// Assumed to live in the declaration's own package.
    SamePackage,
    /// Written fully qualified in the source.
    Qualified,
    /// Could not be resolved; rendered by its written name.
    Unresolved,
}

/// A class, interface or object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Classifier {
    /// Package (empty for unresolved names).
    pub package: String,
    /// Simple name; nested classes are dotted (e.g., `Map.Entry`).
    pub name: String,
    /// How the name was resolved.
    pub origin: ClassifierOrigin,
}

impl Classifier {
    /// Create a classifier.
    pub fn new(package: impl Into<String>, name: impl Into<String>, origin: ClassifierOrigin) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            origin,
        }
    }

    /// A built-in classifier such as `kotlin.String`.
    pub fn builtin(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(package, name, ClassifierOrigin::Builtin)
    }

    /// A name that could not be resolved.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::new("", name, ClassifierOrigin::Unresolved)
    }

    /// Fully qualified name (e.g., `kotlin.collections.List`).
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// The outermost simple name, which is what an import statement names.
    pub fn import_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

/// A generic argument, possibly use-site projected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeArgument {
    /// `*`
    Star,
    /// `T`, `out T` or `in T`.
    Type { variance: Variance, ty: ResolvedType },
}

impl TypeArgument {
    /// An invariant argument.
    pub fn invariant(ty: ResolvedType) -> Self {
        Self::Type {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// The argument type, if not a star projection.
    pub fn ty(&self) -> Option<&ResolvedType> {
        match self {
            Self::Star => None,
            Self::Type { ty, .. } => Some(ty),
        }
    }
}

/// A function type such as `suspend String.(Int) -> Boolean`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionType {
    pub receiver: Option<Box<ResolvedType>>,
    pub parameters: Vec<ResolvedType>,
    pub return_type: Box<ResolvedType>,
    pub is_suspend: bool,
}

/// The shape of a type occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// A class type with its generic arguments.
    Class {
        classifier: Classifier,
        arguments: Vec<TypeArgument>,
    },
    /// A reference to a type parameter at a known scope.
    TypeParameter {
        name: String,
        scope: TypeParameterScope,
    },
    /// A function type.
    Function(FunctionType),
}

/// A resolved type occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedType {
    #[serde(skip)]
    occurrence: OccurrenceId,
    pub kind: TypeKind,
    pub nullable: bool,
}

impl PartialEq for ResolvedType {
    fn eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable && self.kind == other.kind
    }
}

impl Eq for ResolvedType {}

impl Hash for ResolvedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.nullable.hash(state);
    }
}

impl ResolvedType {
    /// Create a new occurrence of the given kind.
    pub fn new(kind: TypeKind, nullable: bool) -> Self {
        Self {
            occurrence: OccurrenceId::fresh(),
            kind,
            nullable,
        }
    }

    /// A class type.
    pub fn class(classifier: Classifier, arguments: Vec<TypeArgument>) -> Self {
        Self::new(
            TypeKind::Class {
                classifier,
                arguments,
            },
            false,
        )
    }

    /// A built-in class type without arguments (e.g., `kotlin.Int`).
    pub fn builtin(package: &str, name: &str) -> Self {
        Self::class(Classifier::builtin(package, name), Vec::new())
    }

    /// A built-in class type with invariant arguments (e.g., `List<String>`).
    pub fn builtin_generic(package: &str, name: &str, args: Vec<ResolvedType>) -> Self {
        Self::class(
            Classifier::builtin(package, name),
            args.into_iter().map(TypeArgument::invariant).collect(),
        )
    }

    /// A type parameter reference.
    pub fn type_parameter(name: impl Into<String>, scope: TypeParameterScope) -> Self {
        Self::new(
            TypeKind::TypeParameter {
                name: name.into(),
                scope,
            },
            false,
        )
    }

    /// A function type.
    pub fn function(parameters: Vec<ResolvedType>, return_type: ResolvedType) -> Self {
        Self::new(
            TypeKind::Function(FunctionType {
                receiver: None,
                parameters,
                return_type: Box::new(return_type),
                is_suspend: false,
            }),
            false,
        )
    }

    /// `kotlin.Unit`
    pub fn unit() -> Self {
        Self::builtin("kotlin", "Unit")
    }

    /// `kotlin.Any?`, the universal top type.
    pub fn nullable_any() -> Self {
        Self::builtin("kotlin", "Any").with_nullable(true)
    }

    /// Return a copy with the given nullability (a new occurrence).
    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self::new(self.kind.clone(), nullable)
    }

    /// Return a copy marked nullable.
    pub fn nullable(&self) -> Self {
        self.with_nullable(true)
    }

    /// The occurrence id used for memoization.
    pub fn occurrence(&self) -> OccurrenceId {
        self.occurrence
    }

    /// The classifier, for class types.
    pub fn classifier(&self) -> Option<&Classifier> {
        match &self.kind {
            TypeKind::Class { classifier, .. } => Some(classifier),
            _ => None,
        }
    }

    /// Generic arguments, for class types.
    pub fn arguments(&self) -> &[TypeArgument] {
        match &self.kind {
            TypeKind::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// The function shape, for function types.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.kind {
            TypeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The type parameter name and scope, for type parameter references.
    pub fn as_type_parameter(&self) -> Option<(&str, TypeParameterScope)> {
        match &self.kind {
            TypeKind::TypeParameter { name, scope } => Some((name, *scope)),
            _ => None,
        }
    }

    /// Whether this is a class type with the given qualified name.
    pub fn is_class(&self, qualified_name: &str) -> bool {
        self.classifier()
            .is_some_and(|c| c.qualified_name() == qualified_name)
    }

    /// Whether this is `kotlin.Unit` (non-null).
    pub fn is_unit(&self) -> bool {
        !self.nullable && self.is_class("kotlin.Unit")
    }

    /// Structural equality that ignores nullability at the top level.
    pub fn same_shape_ignoring_nullability(&self, other: &ResolvedType) -> bool {
        self.kind == other.kind
    }

    /// Whether any type parameter reference matching `pred` occurs in this type.
    pub fn mentions_type_parameter(&self, pred: &dyn Fn(&str, TypeParameterScope) -> bool) -> bool {
        match &self.kind {
            TypeKind::TypeParameter { name, scope } => pred(name, *scope),
            TypeKind::Class { arguments, .. } => arguments
                .iter()
                .filter_map(TypeArgument::ty)
                .any(|t| t.mentions_type_parameter(pred)),
            TypeKind::Function(f) => {
                f.receiver
                    .as_deref()
                    .is_some_and(|r| r.mentions_type_parameter(pred))
                    || f.parameters.iter().any(|p| p.mentions_type_parameter(pred))
                    || f.return_type.mentions_type_parameter(pred)
            }
        }
    }

    /// Whether a type parameter of the given scope occurs in this type.
    pub fn mentions_scope(&self, scope: TypeParameterScope) -> bool {
        self.mentions_type_parameter(&|_, s| s == scope)
    }

    /// Structurally replace type parameter references.
    ///
    /// `replace` is called for every type parameter reference; returning
    /// `Some(ty)` substitutes it (keeping the reference's own nullability
    /// marker), returning `None` keeps the reference.
    pub fn substitute(
        &self,
        replace: &dyn Fn(&str, TypeParameterScope) -> Option<ResolvedType>,
    ) -> ResolvedType {
        match &self.kind {
            TypeKind::TypeParameter { name, scope } => match replace(name, *scope) {
                Some(replacement) => {
                    let nullable = replacement.nullable || self.nullable;
                    replacement.with_nullable(nullable)
                }
                None => self.with_nullable(self.nullable),
            },
            TypeKind::Class {
                classifier,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| match arg {
                        TypeArgument::Star => TypeArgument::Star,
                        TypeArgument::Type { variance, ty } => TypeArgument::Type {
                            variance: *variance,
                            ty: ty.substitute(replace),
                        },
                    })
                    .collect();
                ResolvedType::new(
                    TypeKind::Class {
                        classifier: classifier.clone(),
                        arguments,
                    },
                    self.nullable,
                )
            }
            TypeKind::Function(f) => ResolvedType::new(
                TypeKind::Function(FunctionType {
                    receiver: f
                        .receiver
                        .as_ref()
                        .map(|r| Box::new(r.substitute(replace))),
                    parameters: f.parameters.iter().map(|p| p.substitute(replace)).collect(),
                    return_type: Box::new(f.return_type.substitute(replace)),
                    is_suspend: f.is_suspend,
                }),
                self.nullable,
            ),
        }
    }

    /// Collect every classifier referenced by this type, outermost first.
    pub fn classifiers(&self) -> Vec<&Classifier> {
        let mut out = Vec::new();
        self.collect_classifiers(&mut out);
        out
    }

    fn collect_classifiers<'a>(&'a self, out: &mut Vec<&'a Classifier>) {
        match &self.kind {
            TypeKind::TypeParameter { .. } => {}
            TypeKind::Class {
                classifier,
                arguments,
            } => {
                out.push(classifier);
                for arg in arguments.iter().filter_map(TypeArgument::ty) {
                    arg.collect_classifiers(out);
                }
            }
            TypeKind::Function(f) => {
                if let Some(receiver) = &f.receiver {
                    receiver.collect_classifiers(out);
                }
                for p in &f.parameters {
                    p.collect_classifiers(out);
                }
                f.return_type.collect_classifiers(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> ResolvedType {
        ResolvedType::builtin("kotlin", "String")
    }

    #[test]
    fn test_equality_ignores_occurrence() {
        let a = string();
        let b = string();
        assert_ne!(a.occurrence(), b.occurrence());
        assert_eq!(a, b);
        assert_ne!(a, b.nullable());
    }

    #[test]
    fn test_same_shape_ignoring_nullability() {
        let t = ResolvedType::type_parameter("T", TypeParameterScope::Method);
        assert!(t.same_shape_ignoring_nullability(&t.nullable()));
        assert!(!t.same_shape_ignoring_nullability(&string()));
    }

    #[test]
    fn test_mentions_scope() {
        let list_of_t = ResolvedType::builtin_generic(
            "kotlin.collections",
            "List",
            vec![ResolvedType::type_parameter("T", TypeParameterScope::Class)],
        );
        assert!(list_of_t.mentions_scope(TypeParameterScope::Class));
        assert!(!list_of_t.mentions_scope(TypeParameterScope::Method));

        let f = ResolvedType::function(
            vec![ResolvedType::type_parameter("R", TypeParameterScope::Method)],
            ResolvedType::unit(),
        );
        assert!(f.mentions_scope(TypeParameterScope::Method));
    }

    #[test]
    fn test_substitute_only_matching_scope() {
        let map = ResolvedType::builtin_generic(
            "kotlin.collections",
            "Map",
            vec![
                ResolvedType::type_parameter("K", TypeParameterScope::Class),
                ResolvedType::type_parameter("V", TypeParameterScope::Method).nullable(),
            ],
        );
        let erased = map.substitute(&|_, scope| {
            (scope == TypeParameterScope::Method).then(ResolvedType::nullable_any)
        });

        let args: Vec<_> = erased.arguments().iter().filter_map(TypeArgument::ty).collect();
        assert_eq!(
            args[0].as_type_parameter(),
            Some(("K", TypeParameterScope::Class))
        );
        assert!(args[1].is_class("kotlin.Any"));
        assert!(args[1].nullable);
    }

    #[test]
    fn test_qualified_and_import_names() {
        let entry = Classifier::builtin("kotlin.collections", "Map.Entry");
        assert_eq!(entry.qualified_name(), "kotlin.collections.Map.Entry");
        assert_eq!(entry.import_name(), "Map");

        let unresolved = Classifier::unresolved("Mystery");
        assert_eq!(unresolved.qualified_name(), "Mystery");
    }

    #[test]
    fn test_classifiers_walks_function_types() {
        let f = ResolvedType::function(
            vec![string()],
            ResolvedType::builtin_generic("kotlin.collections", "List", vec![string()]),
        );
        let names: Vec<_> = f.classifiers().iter().map(|c| c.qualified_name()).collect();
        assert_eq!(
            names,
            vec!["kotlin.String", "kotlin.collections.List", "kotlin.String"]
        );
    }
}

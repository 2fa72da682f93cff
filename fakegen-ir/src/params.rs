use serde::Serialize;

use crate::types::ResolvedType;

/// Where a type parameter is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeParameterScope {
    /// Declared on the owning declaration (`interface Repo<T>`).
    Class,
    /// Declared on a single member (`fun <T> find(): T`).
    Method,
}

/// Declaration-site or use-site variance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variance {
    #[default]
    Invariant,
    /// `out`
    Covariant,
    /// `in`
    Contravariant,
}

impl Variance {
    /// The Kotlin keyword for this variance, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Invariant => None,
            Self::Covariant => Some("out"),
            Self::Contravariant => Some("in"),
        }
    }
}

/// An upper bound on a type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeBound {
    /// A bound resolved to a type.
    Resolved(ResolvedType),
    /// A bound kept as written, when the front end could not resolve it.
    Textual(String),
}

/// A declared type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParameterDescriptor {
    pub name: String,
    /// Upper bounds in declaration order.
    pub bounds: Vec<TypeBound>,
    pub variance: Variance,
    pub scope: TypeParameterScope,
}

impl TypeParameterDescriptor {
    /// An unbounded, invariant type parameter.
    pub fn new(name: impl Into<String>, scope: TypeParameterScope) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
            variance: Variance::Invariant,
            scope,
        }
    }

    /// Add an upper bound.
    pub fn with_bound(mut self, bound: TypeBound) -> Self {
        self.bounds.push(bound);
        self
    }

    /// Set the declaration-site variance.
    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    /// A reference to this parameter as a type.
    pub fn as_type(&self) -> ResolvedType {
        ResolvedType::type_parameter(&self.name, self.scope)
    }
}

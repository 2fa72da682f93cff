//! Data shapes: record-like classes whose default can be constructed.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{params::TypeParameterScope, types::{ResolvedType, TypeArgument}};

/// A constructor parameter of a data shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeField {
    pub name: String,
    /// Field type; the shape's own type parameters appear as class-scoped references.
    pub ty: ResolvedType,
}

/// A record-like class with a primary constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataShape {
    pub name: String,
    pub package: String,
    pub type_parameters: Vec<String>,
    /// Primary constructor parameters, in order.
    pub fields: Vec<ShapeField>,
}

impl DataShape {
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Field types with the shape's type parameters replaced by `arguments`.
    ///
    /// Parameters without a matching argument (or with a star projection)
    /// become `Any?`.
    pub fn instantiate_fields(&self, arguments: &[TypeArgument]) -> Vec<(&str, ResolvedType)> {
        let substitute = |name: &str, scope: TypeParameterScope| {
            if scope != TypeParameterScope::Class {
                return None;
            }
            let index = self.type_parameters.iter().position(|p| p == name)?;
            Some(
                arguments
                    .get(index)
                    .and_then(TypeArgument::ty)
                    .cloned()
                    .unwrap_or_else(ResolvedType::nullable_any),
            )
        };
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.substitute(&substitute)))
            .collect()
    }
}

/// Every data shape known to the front end, keyed by qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShapeCatalog {
    shapes: IndexMap<String, DataShape>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape; a later registration with the same name replaces it.
    pub fn insert(&mut self, shape: DataShape) {
        self.shapes.insert(shape.qualified_name(), shape);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&DataShape> {
        self.shapes.get(qualified_name)
    }

    /// Find a shape by simple name. Returns `None` when the name is ambiguous.
    pub fn find_simple(&self, name: &str) -> Option<&DataShape> {
        let mut matches = self.shapes.values().filter(|s| s.name == name);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataShape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl FromIterator<DataShape> for ShapeCatalog {
    fn from_iter<I: IntoIterator<Item = DataShape>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for shape in iter {
            catalog.insert(shape);
        }
        catalog
    }
}

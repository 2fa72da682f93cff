//! Naming conventions for generated fakes.
//!
//! Member names are the join key between the implementation class and the
//! configuration DSL: both sides derive every name through [`MemberNames`].

use fakegen_core::{capitalize, decapitalize, escape_identifier};

/// Names generated for a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNames {
    /// Segments concatenated (`Outer.Inner` -> `OuterInner`).
    pub base: String,
    /// `FakeNameImpl`
    pub implementation: String,
    /// `fakeName`
    pub factory: String,
    /// `FakeNameConfig`
    pub config: String,
}

impl DeclarationNames {
    pub fn new(declaration: &str) -> Self {
        let base: String = declaration.split('.').map(capitalize).collect();
        Self {
            implementation: format!("Fake{base}Impl"),
            factory: format!("fake{base}"),
            config: format!("Fake{base}Config"),
            base,
        }
    }

    /// File name without extension; one file per declaration.
    pub fn file_stem(&self) -> &str {
        &self.implementation
    }

    /// Directory for a package (`com.example` -> `com/example`).
    pub fn package_dir(package: &str) -> String {
        package.split('.').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("/")
    }
}

/// Names generated for one configurable behavior.
///
/// Functions and property getters use the member name; a mutable property's
/// setter uses [`MemberNames::setter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberNames {
    /// Name as written in Kotlin source, escaped.
    pub member: String,
    /// `mBehavior`
    pub behavior: String,
    /// `_mCallCount`
    pub counter_backing: String,
    /// `mCallCount`
    pub counter: String,
    /// `configureM`
    pub configure: String,
    /// DSL method, escaped.
    pub dsl: String,
}

impl MemberNames {
    pub fn new(member: &str) -> Self {
        let stem = decapitalize(member);
        Self {
            member: escape_identifier(member),
            behavior: format!("{stem}Behavior"),
            counter_backing: format!("_{stem}CallCount"),
            counter: format!("{stem}CallCount"),
            configure: format!("configure{}", capitalize(member)),
            dsl: escape_identifier(member),
        }
    }

    /// Names for the setter of a mutable property (`setM`).
    pub fn setter(property: &str) -> Self {
        Self::new(&format!("set{}", capitalize(property)))
    }

    /// Every generated identifier, for collision checks.
    pub fn all(&self) -> [&str; 5] {
        [
            &self.behavior,
            &self.counter_backing,
            &self.counter,
            &self.configure,
            &self.dsl,
        ]
    }
}

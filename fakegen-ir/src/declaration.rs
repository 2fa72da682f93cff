//! Per-member and per-declaration analysis records.
//!
//! These records are the input boundary of code generation: the analyzer
//! builds one [`DeclarationAnalysis`] per marked declaration and nothing
//! mutates it afterwards.

use serde::Serialize;

use crate::{
    params::{TypeParameterDescriptor, TypeParameterScope},
    types::ResolvedType,
};

/// Whether the fake implements or extends its source declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Interface-like: the fake implements it.
    Interface,
    /// Class-like: the fake extends it through its no-arg constructor.
    Class,
}

/// A value parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterAnalysis {
    pub name: String,
    /// Declared type. For a vararg parameter this is the element type.
    pub ty: ResolvedType,
    pub is_vararg: bool,
}

/// A declared function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionAnalysis {
    pub name: String,
    pub parameters: Vec<ParameterAnalysis>,
    pub return_type: ResolvedType,
    pub is_suspend: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub extension_receiver: Option<ResolvedType>,
    pub type_parameters: Vec<TypeParameterDescriptor>,
    /// Abstract members must be implemented; open ones may fall back to `super`.
    pub is_abstract: bool,
}

impl FunctionAnalysis {
    /// Whether the function declares its own type parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// The vararg parameter, if any.
    pub fn vararg_parameter(&self) -> Option<&ParameterAnalysis> {
        self.parameters.iter().find(|p| p.is_vararg)
    }

    /// Every type in the signature, receiver first and return type last.
    pub fn signature_types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.extension_receiver
            .iter()
            .chain(self.parameters.iter().map(|p| &p.ty))
            .chain(std::iter::once(&self.return_type))
    }

    /// Whether a method-level type parameter occurs in the signature.
    pub fn mentions_method_type_parameters(&self) -> bool {
        self.signature_types()
            .any(|t| t.mentions_scope(TypeParameterScope::Method))
    }
}

/// A declared property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyAnalysis {
    pub name: String,
    pub ty: ResolvedType,
    pub is_mutable: bool,
    pub is_abstract: bool,
}

/// One analyzed member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MemberAnalysis {
    Function(FunctionAnalysis),
    Property(PropertyAnalysis),
}

impl MemberAnalysis {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Property(p) => &p.name,
        }
    }
}

/// A borrowed view of a member of a [`DeclarationAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member<'a> {
    Function(&'a FunctionAnalysis),
    Property(&'a PropertyAnalysis),
}

impl<'a> Member<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Function(f) => &f.name,
            Self::Property(p) => &p.name,
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self {
            Self::Function(f) => f.is_abstract,
            Self::Property(p) => p.is_abstract,
        }
    }
}

/// Aggregate analysis of one marked declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeclarationAnalysis {
    /// Simple name; nested declarations are dotted (`Outer.Inner`).
    pub name: String,
    pub package: String,
    pub type_parameters: Vec<TypeParameterDescriptor>,
    /// Functions in source order.
    pub functions: Vec<FunctionAnalysis>,
    /// Properties in source order.
    pub properties: Vec<PropertyAnalysis>,
    pub target: TargetKind,
}

impl DeclarationAnalysis {
    /// Create an empty analysis.
    pub fn new(name: impl Into<String>, package: impl Into<String>, target: TargetKind) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            type_parameters: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            target,
        }
    }

    /// Append a member, keeping source order within its kind.
    pub fn push(&mut self, member: MemberAnalysis) {
        match member {
            MemberAnalysis::Function(f) => self.functions.push(f),
            MemberAnalysis::Property(p) => self.properties.push(p),
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_member(mut self, member: MemberAnalysis) -> Self {
        self.push(member);
        self
    }

    /// Builder-style class-level type parameter.
    pub fn with_type_parameter(mut self, param: TypeParameterDescriptor) -> Self {
        self.type_parameters.push(param);
        self
    }

    /// Fully qualified name (e.g., `com.example.UserRepository`).
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// All members: properties first, then functions, each in source order.
    pub fn members(&self) -> impl Iterator<Item = Member<'_>> {
        self.properties
            .iter()
            .map(Member::Property)
            .chain(self.functions.iter().map(Member::Function))
    }

    /// Whether the declaration itself is generic.
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> FunctionAnalysis {
        FunctionAnalysis {
            name: name.into(),
            parameters: vec![],
            return_type: ResolvedType::unit(),
            is_suspend: false,
            is_operator: false,
            is_infix: false,
            extension_receiver: None,
            type_parameters: vec![],
            is_abstract: true,
        }
    }

    fn property(name: &str) -> PropertyAnalysis {
        PropertyAnalysis {
            name: name.into(),
            ty: ResolvedType::builtin("kotlin", "Int"),
            is_mutable: false,
            is_abstract: true,
        }
    }

    #[test]
    fn test_members_order_is_properties_then_functions() {
        let analysis = DeclarationAnalysis::new("Repo", "com.example", TargetKind::Interface)
            .with_member(MemberAnalysis::Function(function("save")))
            .with_member(MemberAnalysis::Property(property("count")))
            .with_member(MemberAnalysis::Function(function("load")));

        let names: Vec<_> = analysis.members().map(|m| m.name()).collect();
        assert_eq!(names, vec!["count", "save", "load"]);
    }

    #[test]
    fn test_qualified_name() {
        let analysis = DeclarationAnalysis::new("Outer.Inner", "com.example", TargetKind::Interface);
        assert_eq!(analysis.qualified_name(), "com.example.Outer.Inner");

        let root = DeclarationAnalysis::new("Root", "", TargetKind::Class);
        assert_eq!(root.qualified_name(), "Root");
    }

    #[test]
    fn test_signature_types_and_scope() {
        let mut f = function("transform");
        f.extension_receiver = Some(ResolvedType::builtin("kotlin", "String"));
        f.parameters.push(ParameterAnalysis {
            name: "x".into(),
            ty: ResolvedType::type_parameter("T", TypeParameterScope::Method),
            is_vararg: false,
        });
        f.type_parameters
            .push(TypeParameterDescriptor::new("T", TypeParameterScope::Method));

        assert_eq!(f.signature_types().count(), 3);
        assert!(f.mentions_method_type_parameters());
        assert!(f.is_generic());
        assert!(f.vararg_parameter().is_none());
    }

    #[test]
    fn test_analysis_serializes_deterministically() {
        let build = || {
            DeclarationAnalysis::new("Counter", "com.example", TargetKind::Interface)
                .with_member(MemberAnalysis::Function(function("increment")))
        };
        let a = serde_json::to_string(&build()).unwrap();
        let b = serde_json::to_string(&build()).unwrap();
        assert_eq!(a, b);
        assert!(!a.contains("occurrence"));
    }
}

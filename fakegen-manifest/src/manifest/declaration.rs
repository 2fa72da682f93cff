use std::str::FromStr;

use serde::Deserialize;
use toml::Spanned;

use super::types::TypeRef;

/// The kind of a marked declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    Interface,
    FunInterface,
    AbstractClass,
    OpenClass,
    SealedInterface,
    SealedClass,
    FinalClass,
    Object,
    EnumClass,
}

impl DeclarationKind {
    /// Whether a fake implements (rather than extends) this kind.
    pub fn is_interface_like(self) -> bool {
        matches!(
            self,
            Self::Interface | Self::FunInterface | Self::SealedInterface
        )
    }

    /// Whether a fake can be generated for this kind at all.
    pub fn is_fakeable(self) -> bool {
        matches!(
            self,
            Self::Interface | Self::FunInterface | Self::AbstractClass | Self::OpenClass
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::FunInterface => "fun-interface",
            Self::AbstractClass => "abstract-class",
            Self::OpenClass => "open-class",
            Self::SealedInterface => "sealed-interface",
            Self::SealedClass => "sealed-class",
            Self::FinalClass => "final-class",
            Self::Object => "object",
            Self::EnumClass => "enum-class",
        }
    }
}

fn default_kind() -> DeclarationKind {
    DeclarationKind::Interface
}

/// Declaration-site variance of a type parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceDef {
    #[default]
    Invariant,
    Out,
    In,
}

/// A type parameter, on a declaration or a member.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParameterDef {
    pub name: Spanned<String>,

    /// Upper bounds, in order
    #[serde(default)]
    pub bounds: Vec<TypeRef>,

    #[serde(default)]
    pub variance: VarianceDef,

    #[serde(default)]
    pub reified: bool,
}

/// A marked declaration (`[[declarations]]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationDef {
    /// Simple name, dotted for nested declarations (`Outer.Inner`)
    pub name: Spanned<String>,

    #[serde(default)]
    pub package: String,

    #[serde(default = "default_kind")]
    pub kind: DeclarationKind,

    /// Fully qualified names visible to the declaration's type expressions
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDef>,

    /// Members in source order
    #[serde(default)]
    pub members: Vec<MemberDef>,
}

impl DeclarationDef {
    pub fn name(&self) -> &str {
        self.name.get_ref()
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name().to_string()
        } else {
            format!("{}.{}", self.package, self.name())
        }
    }

    /// Find a member by name (first match).
    pub fn member(&self, name: &str) -> Option<&MemberDef> {
        self.members.iter().find(|m| m.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Function,
    Property,
}

/// Where a member comes from, as reported by the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrigin {
    #[default]
    Declared,
    Inherited,
    Synthetic,
}

/// A member modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Suspend,
    Operator,
    Abstract,
    Open,
    Final,
    Infix,
    Inline,
    Override,
}

impl FromStr for Modifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "suspend" => Self::Suspend,
            "operator" => Self::Operator,
            "abstract" => Self::Abstract,
            "open" => Self::Open,
            "final" => Self::Final,
            "infix" => Self::Infix,
            "inline" => Self::Inline,
            "override" => Self::Override,
            _ => return Err(()),
        })
    }
}

/// A value parameter of a function member.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDef {
    pub name: Spanned<String>,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    #[serde(default)]
    pub vararg: bool,
}

/// A member of a declaration (`[[declarations.members]]`).
///
/// Functions and properties share one table shape; fields that do not apply
/// to a kind are rejected during validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDef {
    pub kind: MemberKind,

    pub name: Spanned<String>,

    #[serde(default)]
    pub modifiers: Vec<Spanned<String>>,

    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDef>,

    /// Extension receiver type
    pub receiver: Option<TypeRef>,

    #[serde(default)]
    pub parameters: Vec<ParameterDef>,

    /// Function return type (defaults to `Unit`)
    pub returns: Option<TypeRef>,

    /// Property type
    #[serde(rename = "type")]
    pub ty: Option<TypeRef>,

    /// Whether a property is `var`
    #[serde(default)]
    pub mutable: bool,

    #[serde(default)]
    pub origin: MemberOrigin,
}

impl MemberDef {
    pub fn name(&self) -> &str {
        self.name.get_ref()
    }

    /// Recognized modifiers, in the order written. Unknown keywords are skipped.
    pub fn known_modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().filter_map(|m| m.get_ref().parse().ok())
    }

    /// Modifier keywords that are not recognized, with their spans.
    pub fn unknown_modifiers(&self) -> impl Iterator<Item = &Spanned<String>> {
        self.modifiers
            .iter()
            .filter(|m| m.get_ref().parse::<Modifier>().is_err())
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.known_modifiers().any(|m| m == modifier)
    }
}

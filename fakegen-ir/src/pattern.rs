use serde::Serialize;

/// Generic shape of a declaration.
///
/// Decides where generated storage may reference type parameters:
/// class-level parameters are in scope on the generated class, method-level
/// parameters are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenericPattern {
    NoGenerics,
    /// Only the declaration has type parameters.
    ClassLevelGenerics,
    /// Only members have type parameters.
    MethodLevelGenerics,
    /// Both the declaration and at least one member have type parameters.
    MixedGenerics,
}

impl GenericPattern {
    /// Whether generated declarations carry class-level type parameters.
    pub fn preserves_class_parameters(self) -> bool {
        matches!(self, Self::ClassLevelGenerics | Self::MixedGenerics)
    }

    /// Whether some member storage must erase method-level parameters.
    pub fn erases_method_parameters(self) -> bool {
        matches!(self, Self::MethodLevelGenerics | Self::MixedGenerics)
    }

    /// Human readable label, used by reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoGenerics => "no generics",
            Self::ClassLevelGenerics => "class-level generics",
            Self::MethodLevelGenerics => "method-level generics",
            Self::MixedGenerics => "mixed generics",
        }
    }
}

impl std::fmt::Display for GenericPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

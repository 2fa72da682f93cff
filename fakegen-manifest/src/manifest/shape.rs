use serde::Deserialize;
use toml::Spanned;

use super::types::TypeRef;

/// A data class known to the front end (`[[shapes]]`).
///
/// Shapes let the generator construct default values for members that
/// return them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeDef {
    pub name: Spanned<String>,

    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub type_parameters: Vec<String>,

    /// Primary constructor parameters, in order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl ShapeDef {
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
}

/// A constructor parameter of a shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: Spanned<String>,

    #[serde(rename = "type")]
    pub ty: TypeRef,
}

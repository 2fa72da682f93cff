//! The fakes.toml manifest.

mod declaration;
mod parse;
mod shape;
mod types;

use std::path::PathBuf;

pub use declaration::{
    DeclarationDef, DeclarationKind, MemberDef, MemberKind, MemberOrigin, Modifier, ParameterDef,
    TypeParameterDef, VarianceDef,
};
pub use parse::parse_manifest;
use serde::Deserialize;
pub use shape::{FieldDef, ShapeDef};
pub use types::TypeRef;

/// Root manifest for fakes.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project settings
    pub project: ProjectConfig,

    /// Data shapes usable for default construction
    #[serde(default)]
    pub shapes: Vec<ShapeDef>,

    /// Marked declarations, in generation order
    #[serde(default)]
    pub declarations: Vec<DeclarationDef>,
}

impl Manifest {
    /// Find a declaration by simple or qualified name.
    pub fn declaration(&self, name: &str) -> Option<&DeclarationDef> {
        self.declarations
            .iter()
            .find(|d| d.name() == name || d.qualified_name() == name)
    }
}

/// `[project]` settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Output directory, relative to the manifest
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Whether to skip unchanged declarations
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Header comment written at the top of every generated file
    pub header: Option<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("build/generated/fakegen")
}

pub(crate) fn default_true() -> bool {
    true
}

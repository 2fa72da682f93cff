//! Manifest parsing from files and strings.

use std::{collections::HashMap, ops::Range, path::Path, str::FromStr};

use super::{DeclarationDef, Manifest, MemberDef, MemberKind, ShapeDef, TypeParameterDef};
use crate::{
    Error, Result,
    error::SourceContext,
    validate::{ParseContext, to_span},
};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "fakes.toml")
    }
}

impl Manifest {
    /// Parse a fakes.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a fakes.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source.parse_error(e))?;
    validate_manifest(&manifest, &source)?;
    Ok(manifest)
}

/// Validate the manifest structure after parsing.
///
/// Only checks what makes the manifest unreadable as Kotlin declarations.
/// Whether a declaration can be faked is decided by the validation phase.
fn validate_manifest(manifest: &Manifest, source: &SourceContext) -> Result<()> {
    let ctx = ParseContext::new(source);

    if manifest.project.name.trim().is_empty() {
        return Err(source.validation_error("project name cannot be empty"));
    }

    let mut shapes: HashMap<String, Range<usize>> = HashMap::new();
    for shape in &manifest.shapes {
        validate_shape(&ctx, shape)?;
        if shapes
            .insert(shape.qualified_name(), shape.name.span())
            .is_some()
        {
            return Err(source.validation_error_at(
                format!("duplicate shape '{}'", shape.qualified_name()),
                to_span(shape.name.span()),
            ));
        }
    }

    let mut declarations: HashMap<String, Range<usize>> = HashMap::new();
    for decl in &manifest.declarations {
        validate_declaration(&ctx, decl)?;
        let qualified = decl.qualified_name();
        if let Some(first) = declarations.get(&qualified) {
            return Err(source.duplicate_declaration_error(
                qualified,
                to_span(first.clone()),
                to_span(decl.name.span()),
            ));
        }
        declarations.insert(qualified, decl.name.span());
    }

    Ok(())
}

fn validate_shape(ctx: &ParseContext<'_>, shape: &ShapeDef) -> Result<()> {
    ctx.validate_name(shape.name(), "shape", shape.name.span())?;
    ctx.validate_dotted(&shape.package, "package", None, true)?;

    let ctx = ctx.push(shape.name());
    for param in &shape.type_parameters {
        ctx.validate_name(param, "type parameter", shape.name.span())?;
    }
    for field in &shape.fields {
        ctx.validate_name(field.name.get_ref(), "field", field.name.span())?;
    }
    Ok(())
}

fn validate_declaration(ctx: &ParseContext<'_>, decl: &DeclarationDef) -> Result<()> {
    ctx.validate_dotted(decl.name(), "declaration", Some(decl.name.span()), false)?;
    ctx.validate_dotted(&decl.package, "package", Some(decl.name.span()), true)?;

    for import in &decl.imports {
        ctx.validate_dotted(import, "import", Some(decl.name.span()), false)?;
    }

    let ctx = ctx.push(decl.name());
    validate_type_parameters(&ctx, &decl.type_parameters)?;

    for member in &decl.members {
        validate_member(&ctx, member)?;
    }
    Ok(())
}

fn validate_type_parameters(ctx: &ParseContext<'_>, params: &[TypeParameterDef]) -> Result<()> {
    for param in params {
        ctx.validate_name(param.name.get_ref(), "type parameter", param.name.span())?;
    }
    Ok(())
}

fn validate_member(ctx: &ParseContext<'_>, member: &MemberDef) -> Result<()> {
    ctx.validate_name(member.name(), "member", member.name.span())?;
    let source = ctx.source();
    let ctx = ctx.push(member.name());
    let span = to_span(member.name.span());

    match member.kind {
        MemberKind::Function => {
            if member.ty.is_some() {
                return Err(source.validation_error_at(
                    format!(
                        "function '{}' declares its return type with 'returns', not 'type'",
                        ctx.path_string()
                    ),
                    span,
                ));
            }
            if member.mutable {
                return Err(source.validation_error_at(
                    format!("function '{}' cannot be mutable", ctx.path_string()),
                    span,
                ));
            }
            for param in &member.parameters {
                ctx.validate_name(param.name.get_ref(), "parameter", param.name.span())?;
            }
        }
        MemberKind::Property => {
            if member.ty.is_none() {
                return Err(source.validation_error_at(
                    format!("property '{}' is missing a 'type'", ctx.path_string()),
                    span,
                ));
            }
            if member.returns.is_some() || !member.parameters.is_empty() {
                return Err(source.validation_error_at(
                    format!(
                        "property '{}' cannot declare 'parameters' or 'returns'",
                        ctx.path_string()
                    ),
                    span,
                ));
            }
        }
    }

    validate_type_parameters(&ctx, &member.type_parameters)
}

use std::ops::Range;

use serde::{Deserialize, Deserializer, de::Error as _};
use toml::Spanned;

use crate::syntax::{SyntaxError, TypeExpr, parse_type};

/// A type expression as written in the manifest, parsed on deserialization.
///
/// Syntax errors surface as TOML parse errors pointing at the string.
#[derive(Debug, Clone)]
pub struct TypeRef {
    text: String,
    span: Range<usize>,
    expr: TypeExpr,
}

impl TypeRef {
    /// Parse a type expression outside of a manifest (no source span).
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            text: text.to_string(),
            span: 0..0,
            expr: parse_type(text)?,
        })
    }

    /// The expression as written.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of the string in the manifest source.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn expr(&self) -> &TypeExpr {
        &self.expr
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let spanned = Spanned::<String>::deserialize(deserializer)?;
        let span = spanned.span();
        let text = spanned.into_inner();
        let expr = parse_type(&text)
            .map_err(|e| D::Error::custom(format!("invalid type '{text}': {e}")))?;
        Ok(Self { text, span, expr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        ty: TypeRef,
    }

    #[test]
    fn test_deserialize_records_span() {
        let src = "ty = \"List<String>\"";
        let holder: Holder = toml::from_str(src).unwrap();
        assert_eq!(holder.ty.text(), "List<String>");
        assert_eq!(&src[holder.ty.span()], "\"List<String>\"");
    }

    #[test]
    fn test_deserialize_rejects_bad_syntax() {
        let err = toml::from_str::<Holder>("ty = \"List<\"").err().unwrap();
        assert!(err.message().contains("invalid type 'List<'"));
    }
}

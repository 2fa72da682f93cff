//! Validation utilities for Kotlin names in the manifest

use std::ops::Range;

use fakegen_core::is_valid_identifier;
use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Validation context that carries source information.
///
/// Holds the source context and the current path through the manifest
/// hierarchy, so nested validation can produce messages such as
/// "parameter in 'UserRepository.save'".
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(&source);
/// let member = ctx.push("UserRepository").push("save");
/// member.validate_name(&param.name, "parameter")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: &'a SourceContext,
    /// Path segments for nested validation (e.g., ["UserRepository", "save"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context over the given source.
    pub fn new(source: &'a SourceContext) -> Self {
        Self {
            source,
            path: Vec::new(),
        }
    }

    /// Get the source context.
    pub fn source(&self) -> &'a SourceContext {
        self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: self.source,
            path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "parameter in 'Repo.save'" or just "declaration" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Validate that a name is a plain Kotlin identifier.
    pub fn validate_name(&self, name: &str, kind: &str, span: Range<usize>) -> Result<()> {
        if let Some(reason) = is_valid_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                Some(to_span(span)),
            ));
        }
        Ok(())
    }

    /// Validate a dotted name (package or nested declaration) segment by segment.
    ///
    /// An empty name is accepted when `allow_empty` is set (the root package).
    pub fn validate_dotted(
        &self,
        name: &str,
        kind: &str,
        span: Option<Range<usize>>,
        allow_empty: bool,
    ) -> Result<()> {
        if name.is_empty() && allow_empty {
            return Ok(());
        }
        for segment in name.split('.') {
            if let Some(reason) = is_valid_identifier(segment) {
                return Err(self.source.invalid_identifier_error(
                    name,
                    self.context_for(kind),
                    reason,
                    span.clone().map(to_span),
                ));
            }
        }
        Ok(())
    }
}

/// Convert a byte range into a miette span.
pub(crate) fn to_span(range: Range<usize>) -> SourceSpan {
    SourceSpan::from(range.start..range.end)
}

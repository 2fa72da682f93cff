use serde::Serialize;

/// How a default behavior was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultStrategy {
    /// A fixed literal from the well-known classifier table (`""`, `0`, `emptyList()`).
    Literal,
    /// `null` for a nullable or erased type.
    Null,
    /// Return the single argument unchanged.
    Identity,
    /// Invoke the supplied zero-argument function.
    FunctionInvocation,
    /// Construct a data shape from field defaults.
    RecursiveConstruction,
    /// Fail loudly when invoked without configuration.
    ErrorStub,
}

impl DefaultStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Null => "null",
            Self::Identity => "identity",
            Self::FunctionInvocation => "function-invocation",
            Self::RecursiveConstruction => "recursive-construction",
            Self::ErrorStub => "error-stub",
        }
    }
}

impl std::fmt::Display for DefaultStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A rendered default expression and how it was derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DefaultValueExpression {
    /// Kotlin expression text.
    pub expression: String,
    pub strategy: DefaultStrategy,
}

impl DefaultValueExpression {
    pub fn new(expression: impl Into<String>, strategy: DefaultStrategy) -> Self {
        Self {
            expression: expression.into(),
            strategy,
        }
    }

    pub fn literal(expression: impl Into<String>) -> Self {
        Self::new(expression, DefaultStrategy::Literal)
    }

    pub fn null() -> Self {
        Self::new("null", DefaultStrategy::Null)
    }

    /// An `error(...)` call naming what was left unconfigured.
    pub fn error_stub(what: &str) -> Self {
        Self::new(
            format!("error(\"{} not configured\")", what.replace('"', "\\\"")),
            DefaultStrategy::ErrorStub,
        )
    }

    pub fn is_error_stub(&self) -> bool {
        self.strategy == DefaultStrategy::ErrorStub
    }
}

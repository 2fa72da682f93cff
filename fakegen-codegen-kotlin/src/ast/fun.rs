//! Kotlin function builder.

use fakegen_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// A value parameter of a Kotlin function.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub vararg: bool,
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            vararg: false,
            default: None,
        }
    }

    pub fn vararg(mut self, vararg: bool) -> Self {
        self.vararg = vararg;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn render(&self) -> String {
        let vararg = if self.vararg { "vararg " } else { "" };
        match &self.default {
            Some(value) => format!("{vararg}{}: {} = {value}", self.name, self.ty),
            None => format!("{vararg}{}: {}", self.name, self.ty),
        }
    }
}

#[derive(Debug, Clone)]
enum Body {
    Block(Vec<CodeFragment>),
    Expression(String),
}

/// Builder for Kotlin functions.
#[derive(Debug, Clone)]
pub struct Fun {
    name: String,
    annotations: Vec<String>,
    modifiers: Vec<String>,
    type_parameters: String,
    receiver: Option<String>,
    params: Vec<Param>,
    return_type: Option<String>,
    where_suffix: String,
    body: Body,
}

impl Fun {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            modifiers: Vec::new(),
            type_parameters: String::new(),
            receiver: None,
            params: Vec::new(),
            return_type: None,
            where_suffix: String::new(),
            body: Body::Block(Vec::new()),
        }
    }

    /// Add an annotation, without the leading `@`.
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn annotation_if(self, condition: bool, annotation: impl Into<String>) -> Self {
        if condition {
            self.annotation(annotation)
        } else {
            self
        }
    }

    /// Add a modifier keyword (`override`, `suspend`, `internal`, ...).
    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers.extend(modifiers.into_iter().map(Into::into));
        self
    }

    /// Type parameter header, e.g. `<T : Comparable<T>>`.
    pub fn type_parameters(mut self, declaration: impl Into<String>) -> Self {
        self.type_parameters = declaration.into();
        self
    }

    pub fn receiver(mut self, receiver: Option<impl Into<String>>) -> Self {
        self.receiver = receiver.map(Into::into);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declared return type. `Unit` is left implicit.
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        self.return_type = (ty != "Unit").then_some(ty);
        self
    }

    /// ` where ...` clause, rendered after the return type.
    pub fn where_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.where_suffix = suffix.into();
        self
    }

    /// Add a line to a block body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        match &mut self.body {
            Body::Block(lines) => lines.push(CodeFragment::line(line)),
            Body::Expression(_) => self.body = Body::Block(vec![CodeFragment::line(line)]),
        }
        self
    }

    /// Use an expression body (`= expr`), placed on its own indented line.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.body = Body::Expression(expression.into());
        self
    }

    fn signature(&self) -> String {
        let mut signature = String::new();
        for modifier in &self.modifiers {
            signature.push_str(modifier);
            signature.push(' ');
        }
        signature.push_str("fun ");
        if !self.type_parameters.is_empty() {
            signature.push_str(&self.type_parameters);
            signature.push(' ');
        }
        if let Some(receiver) = &self.receiver {
            signature.push_str(receiver);
            signature.push('.');
        }
        signature.push_str(&self.name);
        signature.push('(');
        signature.push_str(
            &self
                .params
                .iter()
                .map(Param::render)
                .collect::<Vec<_>>()
                .join(", "),
        );
        signature.push(')');
        if let Some(ty) = &self.return_type {
            signature.push_str(": ");
            signature.push_str(ty);
        }
        signature.push_str(&self.where_suffix);
        signature
    }

    /// Build the function as a string.
    pub fn build(&self) -> String {
        CodeBuilder::render(self)
    }
}

impl Renderable for Fun {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments: Vec<CodeFragment> = self
            .annotations
            .iter()
            .map(|a| CodeFragment::line(format!("@{a}")))
            .collect();
        let signature = self.signature();
        fragments.push(match &self.body {
            Body::Block(lines) => CodeFragment::braced(format!("{signature} {{"), lines.clone()),
            Body::Expression(expression) => CodeFragment::block(
                format!("{signature} ="),
                vec![CodeFragment::line(expression.clone())],
                None,
            ),
        });
        fragments
    }
}

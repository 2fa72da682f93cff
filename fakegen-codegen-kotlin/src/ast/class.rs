//! Kotlin class builder.

use fakegen_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// Builder for Kotlin classes.
///
/// Members are added in sections; sections are separated by a blank line.
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    type_parameters: String,
    constructor: Option<String>,
    supertype: Option<String>,
    where_suffix: String,
    sections: Vec<Vec<CodeFragment>>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_parameters: String::new(),
            constructor: None,
            supertype: None,
            where_suffix: String::new(),
            sections: Vec::new(),
        }
    }

    pub fn type_parameters(mut self, declaration: impl Into<String>) -> Self {
        self.type_parameters = declaration.into();
        self
    }

    /// Primary constructor parameters, e.g. `private val fake: FakeRepoImpl`.
    pub fn constructor(mut self, parameters: impl Into<String>) -> Self {
        self.constructor = Some(parameters.into());
        self
    }

    pub fn supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn where_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.where_suffix = suffix.into();
        self
    }

    /// Add a section of members. Empty sections are skipped.
    pub fn section(mut self, fragments: Vec<CodeFragment>) -> Self {
        if !fragments.is_empty() {
            self.sections.push(fragments);
        }
        self
    }

    /// Add one section per member.
    pub fn sections(mut self, members: impl IntoIterator<Item = Vec<CodeFragment>>) -> Self {
        for member in members {
            self = self.section(member);
        }
        self
    }

    fn header(&self) -> String {
        let mut header = format!("class {}{}", self.name, self.type_parameters);
        if let Some(parameters) = &self.constructor {
            header.push('(');
            header.push_str(parameters);
            header.push(')');
        }
        if let Some(supertype) = &self.supertype {
            header.push_str(" : ");
            header.push_str(supertype);
        }
        header.push_str(&self.where_suffix);
        header.push_str(" {");
        header
    }

    /// Build the class as a string.
    pub fn build(&self) -> String {
        CodeBuilder::render(self)
    }
}

impl Renderable for Class {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let body = if self.sections.is_empty() {
            Vec::new()
        } else {
            vec![CodeFragment::sections(self.sections.iter().cloned())]
        };
        vec![CodeFragment::braced(self.header(), body)]
    }
}

//! Indentation-free description of generated code.

/// A piece of generated code.
///
/// Fragments nest; only the [`CodeBuilder`](super::CodeBuilder) that writes
/// them knows the absolute indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    Line(String),
    Blank,
    /// `header`, the body one level deeper, then `close` if any.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    /// Groups written one after the other with a blank line between them.
    /// Empty groups are skipped.
    Sections(Vec<Vec<CodeFragment>>),
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn blank() -> Self {
        Self::Blank
    }

    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }

    /// A `header {` block closed by a lone brace.
    pub fn braced(header: impl Into<String>, body: Vec<CodeFragment>) -> Self {
        Self::block(header, body, Some("}".to_string()))
    }

    pub fn sections(sections: impl IntoIterator<Item = Vec<CodeFragment>>) -> Self {
        Self::Sections(
            sections
                .into_iter()
                .filter(|section| !section.is_empty())
                .collect(),
        )
    }
}

/// A node that can describe itself as code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_closes_with_brace() {
        assert_eq!(
            CodeFragment::braced("fun run() {", vec![CodeFragment::line("return")]),
            CodeFragment::Block {
                header: "fun run() {".to_string(),
                body: vec![CodeFragment::Line("return".to_string())],
                close: Some("}".to_string()),
            }
        );
    }

    #[test]
    fn test_sections_drop_empty_groups() {
        let sections = CodeFragment::sections([
            vec![CodeFragment::line("a")],
            Vec::new(),
            vec![CodeFragment::line("b")],
        ]);
        assert_eq!(
            sections,
            CodeFragment::Sections(vec![
                vec![CodeFragment::line("a")],
                vec![CodeFragment::line("b")],
            ])
        );
    }
}

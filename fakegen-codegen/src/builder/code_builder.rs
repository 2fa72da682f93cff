//! Writes code fragments into an indented source buffer.

use super::{CodeFragment, Renderable};

/// One indentation level, per the Kotlin coding conventions.
pub const KOTLIN_INDENT: &str = "    ";

/// Indented source buffer.
///
/// Never writes a blank line at the start of the buffer or two in a row, so
/// nodes can separate themselves freely.
///
/// ```
/// use fakegen_codegen::builder::{CodeBuilder, CodeFragment};
///
/// let mut builder = CodeBuilder::kotlin();
/// builder.apply_fragment(CodeFragment::braced(
///     "fun main() {",
///     vec![CodeFragment::line("println(\"Hello, world!\")")],
/// ));
///
/// assert_eq!(builder.build(), "fun main() {\n    println(\"Hello, world!\")\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    depth: usize,
    unit: &'static str,
    buffer: String,
}

impl CodeBuilder {
    pub fn kotlin() -> Self {
        Self {
            depth: 0,
            unit: KOTLIN_INDENT,
            buffer: String::new(),
        }
    }

    /// Render a single node on its own.
    pub fn render(node: &impl Renderable) -> String {
        let mut builder = Self::kotlin();
        builder.emit(node);
        builder.build()
    }

    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.buffer.push_str(self.unit);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    pub fn push_blank(&mut self) -> &mut Self {
        if !self.buffer.is_empty() && !self.buffer.ends_with("\n\n") {
            self.buffer.push('\n');
        }
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply_fragment(fragment);
        }
        self
    }

    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.push_indent();
                for f in body {
                    self.apply_fragment(f);
                }
                self.push_dedent();
                if let Some(c) = close {
                    self.push_line(&c);
                }
            }
            CodeFragment::Sections(sections) => {
                for (i, section) in sections.into_iter().enumerate() {
                    if i > 0 {
                        self.push_blank();
                    }
                    for f in section {
                        self.apply_fragment(f);
                    }
                }
            }
        }
    }

    pub fn build(self) -> String {
        self.buffer
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::kotlin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_saturates() {
        let mut builder = CodeBuilder::kotlin();
        builder.push_dedent().push_line("x");
        assert_eq!(builder.build(), "x\n");
    }

    #[test]
    fn test_blank_lines_collapse() {
        let mut builder = CodeBuilder::kotlin();
        builder.push_blank().push_line("package com.example").push_blank().push_blank();
        builder.push_line("class A");
        assert_eq!(builder.build(), "package com.example\n\nclass A\n");
    }

    #[test]
    fn test_nested_blocks_and_sections() {
        struct Fake;
        impl Renderable for Fake {
            fn to_fragments(&self) -> Vec<CodeFragment> {
                vec![CodeFragment::braced(
                    "class FakeClockImpl : Clock {",
                    vec![CodeFragment::sections([
                        vec![CodeFragment::line("private var nowBehavior: () -> Long = { 0L }")],
                        vec![CodeFragment::braced(
                            "override fun now(): Long {",
                            vec![CodeFragment::line("return nowBehavior()")],
                        )],
                    ])],
                )]
            }
        }

        assert_eq!(
            CodeBuilder::render(&Fake),
            "class FakeClockImpl : Clock {\n    private var nowBehavior: () -> Long = { 0L }\n\n    override fun now(): Long {\n        return nowBehavior()\n    }\n}\n"
        );
    }
}

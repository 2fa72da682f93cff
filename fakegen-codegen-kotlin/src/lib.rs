//! Kotlin backend for fakegen.
//!
//! Renders [`GeneratedCodeDocument`](fakegen_codegen::document::GeneratedCodeDocument)s
//! to Kotlin source and writes one `Fake<Name>Impl.kt` per declaration.

mod generator;
mod imports;
mod render;

pub mod ast;
pub mod files;

pub use ast::{Class, Fun, Param};
pub use fakegen_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use generator::Generator;
pub use imports::{DEFAULT_IMPORTS, import_statements, needs_import};
pub use render::KotlinRenderer;

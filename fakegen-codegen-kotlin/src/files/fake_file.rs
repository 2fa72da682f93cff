use std::path::{Path, PathBuf};

use fakegen_codegen::{document::GeneratedCodeDocument, naming::DeclarationNames};
use fakegen_core::{FileRules, GeneratedFile, Overwrite};

use crate::KotlinRenderer;

/// The `.kt` file holding the fake of one declaration.
pub struct FakeFile<'d> {
    document: &'d GeneratedCodeDocument,
    header: Option<String>,
}

impl<'d> FakeFile<'d> {
    pub fn new(document: &'d GeneratedCodeDocument, header: Option<String>) -> Self {
        Self { document, header }
    }

    /// Path relative to the output directory (`com/example/FakeRepoImpl.kt`).
    pub fn relative_path(&self) -> String {
        relative_path(&self.document.package, &self.document.file_stem)
    }
}

/// Output path of a generated file, relative to the output directory.
pub fn relative_path(package: &str, file_stem: &str) -> String {
    let dir = DeclarationNames::package_dir(package);
    if dir.is_empty() {
        format!("{file_stem}.kt")
    } else {
        format!("{dir}/{file_stem}.kt")
    }
}

impl GeneratedFile for FakeFile<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.relative_path())
    }

    fn rules(&self) -> FileRules {
        FileRules {
            overwrite: Overwrite::IfChanged,
            header: self.header.clone(),
        }
    }

    fn render(&self) -> String {
        KotlinRenderer::new(self.document).render()
    }
}

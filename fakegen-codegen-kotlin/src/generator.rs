use std::path::Path;

use eyre::Result;
use fakegen_codegen::{
    cache::GenerationCache,
    document::GeneratedCodeDocument,
    generation::{FileEntry, FileRegistry},
    language::{GenerateResult, LanguageCodegen, PreviewFile},
    pipeline::CompilationContext,
};
use indexmap::IndexMap;
use tracing::debug;

use crate::files::FakeFile;

/// Kotlin code generator that writes one fake per built document.
#[derive(Debug, Default)]
pub struct Generator {
    documents: Vec<GeneratedCodeDocument>,
    header: Option<String>,
    /// Fingerprints of every analyzed declaration, cached or not.
    fingerprints: IndexMap<String, u64>,
    cache: Option<GenerationCache>,
    cached: Vec<String>,
}

impl LanguageCodegen for Generator {
    fn language(&self) -> &'static str {
        "kotlin"
    }

    fn preview(&self) -> Vec<PreviewFile> {
        self.registry()
            .preview()
            .into_iter()
            .map(|entry| PreviewFile {
                path: entry.path,
                content: entry.content,
            })
            .collect()
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let stats = self.registry().write_all(output_dir)?;
        debug!(
            language = self.language(),
            written = stats.written.len(),
            unchanged = stats.unchanged.len(),
            "wrote files"
        );

        // Recorded once every file is on disk.
        if let Some(cache) = &self.cache {
            let mut cache = cache.clone();
            for document in &self.documents {
                let qualified = document.qualified_name();
                if let Some(fingerprint) = self.fingerprints.get(&qualified) {
                    let path = FakeFile::new(document, None).relative_path();
                    cache.record(qualified, *fingerprint, path);
                }
            }
            cache.retain(|name| self.fingerprints.contains_key(name));
            cache.save(output_dir)?;
        }

        Ok(GenerateResult {
            written: stats.written,
            unchanged: stats.unchanged,
            cached: self.cached.clone(),
        })
    }
}

impl Generator {
    /// A generator for already built documents, without caching.
    pub fn new(documents: impl IntoIterator<Item = GeneratedCodeDocument>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Take the built documents and cache state of a finished pipeline run.
    pub fn from_context(ctx: CompilationContext) -> Self {
        Self {
            header: ctx.manifest.project.header.clone(),
            documents: ctx.documents.into_values().collect(),
            fingerprints: ctx.fingerprints,
            cache: ctx.cache,
            cached: ctx.cached,
        }
    }

    pub fn documents(&self) -> &[GeneratedCodeDocument] {
        &self.documents
    }

    fn registry(&self) -> FileRegistry {
        let mut registry = FileRegistry::new();
        for document in &self.documents {
            let file = FakeFile::new(document, self.header.clone());
            registry.register(FileEntry::from_generated(file.relative_path(), &file));
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fakegen_codegen::pipeline::Pipeline;
    use fakegen_manifest::Manifest;
    use tempfile::TempDir;

    use super::*;

    const CLOCK: &str = r#"
        [project]
        name = "test"
        header = "Generated by fakegen."

        [[declarations]]
        name = "Clock"
        package = "com.example.time"

        [[declarations.members]]
        kind = "function"
        name = "now"
        returns = "Long"
    "#;

    fn generator(src: &str, cache_dir: Option<&Path>) -> Generator {
        let manifest = Manifest::from_str(src).unwrap();
        let mut pipeline = Pipeline::new();
        if let Some(dir) = cache_dir {
            pipeline = pipeline.cache(dir);
        }
        Generator::from_context(pipeline.run(manifest).unwrap())
    }

    #[test]
    fn test_preview_paths_and_header() {
        let files = generator(CLOCK, None).preview();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "com/example/time/FakeClockImpl.kt");
        assert!(
            files[0]
                .content
                .starts_with("// Generated by fakegen.\npackage com.example.time\n")
        );
    }

    #[test]
    fn test_generate_writes_cache_after_files() {
        let dir = TempDir::new().unwrap();
        let result = generator(CLOCK, Some(dir.path()))
            .generate(dir.path())
            .unwrap();
        assert_eq!(result.written, vec!["com/example/time/FakeClockImpl.kt"]);
        assert!(result.cached.is_empty());
        assert!(GenerationCache::path(dir.path()).exists());

        let second = generator(CLOCK, Some(dir.path()));
        assert!(second.documents().is_empty());
        let result = second.generate(dir.path()).unwrap();
        assert!(result.written.is_empty());
        assert_eq!(result.cached, vec!["com.example.time.Clock"]);
    }

    #[test]
    fn test_generate_without_cache_leaves_no_cache_file() {
        let dir = TempDir::new().unwrap();
        let result = generator(CLOCK, None).generate(dir.path()).unwrap();
        assert_eq!(result.written.len(), 1);
        assert!(!GenerationCache::path(dir.path()).exists());

        let again = generator(CLOCK, None).generate(dir.path()).unwrap();
        assert_eq!(again.unchanged, vec!["com/example/time/FakeClockImpl.kt"]);
    }
}

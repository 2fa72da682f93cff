//! Build phase - turns declaration analyses into generated code documents.

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::{
    cache::{GenerationCache, fingerprint, settings_hash},
    pipeline::{CompilationContext, Phase},
    structure::StructureBuilder,
};

/// Phase that runs the Code Structure Builder for each analyzed declaration.
///
/// When the context carries a cache directory, declarations whose
/// fingerprint matches an existing output file are skipped. Skipped
/// declarations are never classified, so their generic pattern stays out of
/// the session memo.
pub struct BuildPhase;

impl Phase for BuildPhase {
    fn name(&self) -> &'static str {
        "build"
    }

    fn description(&self) -> &'static str {
        "Build generated code documents"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        if let Some(dir) = &ctx.cache_dir {
            let settings = settings_hash(
                ctx.manifest.project.header.as_deref(),
                ctx.session.shapes(),
            )?;
            ctx.cache = Some(GenerationCache::load(dir, settings));
        }

        let builder = StructureBuilder::new(&ctx.session);
        for (name, analysis) in &ctx.analyses {
            let fp = fingerprint(analysis)?;
            ctx.fingerprints.insert(name.clone(), fp);

            if let (Some(cache), Some(dir)) = (&ctx.cache, &ctx.cache_dir)
                && cache.is_fresh(name, fp, dir)
            {
                debug!(declaration = %name, "cache hit");
                ctx.cached.push(name.clone());
                continue;
            }

            let document = builder.build(analysis);
            document
                .verify_consistency()
                .wrap_err_with(|| format!("inconsistent document for {name}"))?;
            ctx.documents.insert(name.clone(), document);
        }

        let stats = ctx.session.stats();
        debug!(
            built = ctx.documents.len(),
            cached = ctx.cached.len(),
            render_hits = stats.render_hits,
            render_misses = stats.render_misses,
            classifications = stats.classifications,
            "build finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, str::FromStr};

    use fakegen_manifest::Manifest;
    use tempfile::TempDir;

    use super::*;
    use crate::pipeline::phases::AnalyzePhase;

    const MANIFEST: &str = r#"
        [project]
        name = "test"

        [[declarations]]
        name = "Repo"
        package = "com.example"
        type_parameters = [{ name = "T" }]

        [[declarations.members]]
        kind = "function"
        name = "get"
        returns = "T?"

        [[declarations]]
        name = "Clock"
        package = "com.example"

        [[declarations.members]]
        kind = "property"
        name = "now"
        type = "Long"
    "#;

    fn analyzed(cache_dir: Option<&TempDir>) -> CompilationContext {
        let mut ctx = CompilationContext::new(Manifest::from_str(MANIFEST).unwrap());
        ctx.cache_dir = cache_dir.map(|dir| dir.path().to_path_buf());
        AnalyzePhase.run(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn test_build_without_cache() {
        let mut ctx = analyzed(None);
        BuildPhase.run(&mut ctx).unwrap();

        assert_eq!(ctx.documents.len(), 2);
        assert_eq!(ctx.fingerprints.len(), 2);
        assert!(ctx.cached.is_empty());
        assert!(ctx.cache.is_none());
    }

    #[test]
    fn test_cache_hit_skips_classification() {
        let dir = TempDir::new().unwrap();

        let mut first = analyzed(Some(&dir));
        BuildPhase.run(&mut first).unwrap();
        let mut cache = first.cache.take().unwrap();
        for (name, document) in &first.documents {
            let file = format!("com/example/{}.kt", document.file_stem);
            fs::create_dir_all(dir.path().join("com/example")).unwrap();
            fs::write(dir.path().join(&file), "").unwrap();
            cache.record(name.clone(), first.fingerprints[name], file);
        }
        cache.save(dir.path()).unwrap();

        let mut second = analyzed(Some(&dir));
        BuildPhase.run(&mut second).unwrap();

        assert!(second.documents.is_empty());
        assert_eq!(second.cached, ["com.example.Repo", "com.example.Clock"]);
        assert!(!second.session.is_classified("com.example.Repo"));
        assert_eq!(second.session.stats().classifications, 0);
    }

    #[test]
    fn test_missing_output_file_rebuilds() {
        let dir = TempDir::new().unwrap();

        let mut first = analyzed(Some(&dir));
        BuildPhase.run(&mut first).unwrap();
        let mut cache = first.cache.take().unwrap();
        cache.record(
            "com.example.Clock",
            first.fingerprints["com.example.Clock"],
            "com/example/FakeClockImpl.kt",
        );
        cache.save(dir.path()).unwrap();

        let mut second = analyzed(Some(&dir));
        BuildPhase.run(&mut second).unwrap();

        assert_eq!(second.documents.len(), 2);
        assert!(second.cached.is_empty());
    }
}

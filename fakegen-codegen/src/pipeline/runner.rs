//! Pipeline orchestrator.

use std::path::PathBuf;

use eyre::Result;
use fakegen_manifest::Manifest;
use tracing::debug;

use super::{
    CompilationContext, Phase, PhaseInfo, Plugin,
    phases::{AnalyzePhase, BuildPhase, ValidatePhase},
};

/// The compilation pipeline orchestrator.
///
/// The pipeline manages the execution of compilation phases and plugin hooks.
/// It runs built-in phases (validate, analyze, build) followed by any user
/// phases, calling plugin hooks before and after each phase. Phases run
/// strictly one after the other.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .cache("build/generated/fakegen")
///     .plugin(MyPlugin::new());
///
/// let ctx = pipeline.run(manifest)?;
/// ```
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
    cache_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Create a new pipeline with default built-in phases.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            plugins: Vec::new(),
            cache_dir: None,
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Skip declarations whose output in `output_dir` is up to date.
    pub fn cache(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(output_dir.into());
        self
    }

    /// Run the pipeline on a manifest.
    ///
    /// Executes all phases in order:
    /// 1. ValidatePhase - runs lints, fails on errors
    /// 2. AnalyzePhase - one declaration analysis per fakeable declaration
    /// 3. BuildPhase - one generated code document per declaration
    /// 4. User phases (if any)
    ///
    /// Plugin hooks are called before and after each phase.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally.
    pub fn run(&self, manifest: Manifest) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(manifest);
        ctx.cache_dir = self.cache_dir.clone();

        for phase in builtin_phases().iter().chain(self.phases.iter()) {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }

        Ok(ctx)
    }

    /// Name and description of every phase `run` executes, in order.
    pub fn phase_info(&self) -> Vec<PhaseInfo> {
        builtin_phases()
            .iter()
            .chain(self.phases.iter())
            .map(|phase| phase.info())
            .collect()
    }

    /// Run only the phases that do not build documents.
    ///
    /// Used by `check`, which reports diagnostics without generating. Failed
    /// validation is not an error here: the context is returned with its
    /// error diagnostics and without analyses.
    pub fn check(&self, manifest: Manifest) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(manifest);
        if let Err(err) = self.run_phase(&ValidatePhase::new(), &mut ctx) {
            if !ctx.has_errors() {
                return Err(err);
            }
            debug!(errors = ctx.error_count(), "validation failed, skipping analysis");
            return Ok(ctx);
        }
        self.run_phase(&AnalyzePhase, &mut ctx)?;
        Ok(ctx)
    }

    /// Run a single phase with plugin hooks.
    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        debug!(phase = phase_name, "running phase");

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

fn builtin_phases() -> Vec<Box<dyn Phase>> {
    vec![
        Box::new(ValidatePhase::new()),
        Box::new(AnalyzePhase),
        Box::new(BuildPhase),
    ]
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use super::*;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct OrderPlugin(Arc<Mutex<Vec<String>>>);

    impl Plugin for OrderPlugin {
        fn name(&self) -> &'static str {
            "order"
        }

        fn on_after_phase(&self, phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.0.lock().unwrap().push(phase.to_string());
            Ok(())
        }
    }

    fn make_test_manifest() -> Manifest {
        Manifest::from_str(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Counter"
            package = "com.example"

            [[declarations.members]]
            kind = "function"
            name = "increment"
            returns = "Int"
        "#,
        )
        .expect("Failed to parse test manifest")
    }

    #[test]
    fn test_pipeline_runs_phases() {
        let ctx = Pipeline::new()
            .run(make_test_manifest())
            .expect("pipeline should succeed");

        assert_eq!(ctx.analyses.len(), 1);
        assert!(ctx.documents.contains_key("com.example.Counter"));
        assert!(ctx.fingerprints.contains_key("com.example.Counter"));
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let pipeline = Pipeline::new().plugin(plugin);
        let _ = pipeline
            .run(make_test_manifest())
            .expect("pipeline should succeed");

        // 3 built-in phases = 3 before + 3 after hooks
        assert_eq!(before_count.load(Ordering::SeqCst), 3);
        assert_eq!(after_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_phases_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        Pipeline::new()
            .plugin(OrderPlugin(seen.clone()))
            .run(make_test_manifest())
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), ["validate", "analyze", "build"]);
    }

    #[test]
    fn test_check_skips_build() {
        let ctx = Pipeline::new().check(make_test_manifest()).unwrap();

        assert_eq!(ctx.analyses.len(), 1);
        assert!(ctx.documents.is_empty());
    }

    #[test]
    fn test_phase_info_lists_builtins() {
        let names: Vec<&str> = Pipeline::new().phase_info().iter().map(|p| p.name).collect();
        assert_eq!(names, ["validate", "analyze", "build"]);
    }

    #[test]
    fn test_check_keeps_validation_errors() {
        let manifest = Manifest::from_str(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Mode"
            kind = "enum-class"
            "#,
        )
        .unwrap();

        assert!(Pipeline::new().run(manifest.clone()).is_err());
        let ctx = Pipeline::new().check(manifest).unwrap();
        assert!(ctx.has_errors());
        assert!(ctx.analyses.is_empty());
    }
}

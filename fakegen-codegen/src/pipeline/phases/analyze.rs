//! Analyze phase - turns manifest declarations into declaration analyses.

use eyre::Result;
use tracing::debug;

use crate::{
    analysis::{MemberAnalyzer, build_shapes},
    pipeline::{CompilationContext, Phase},
    session::AnalysisSession,
};

/// Phase that runs the Member Analyzer over every fakeable declaration.
///
/// Starts the run's [`AnalysisSession`] with the manifest's data shapes, so
/// every later phase shares one set of memos.
pub struct AnalyzePhase;

impl Phase for AnalyzePhase {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn description(&self) -> &'static str {
        "Resolve types and analyze declaration members"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        ctx.session = AnalysisSession::with_shapes(build_shapes(&ctx.manifest));
        ctx.analyses.clear();

        let analyzer = MemberAnalyzer::new(ctx.session.shapes());
        for declaration in &ctx.manifest.declarations {
            if !declaration.kind.is_fakeable() {
                continue;
            }
            let analysis = analyzer.analyze(declaration);
            debug!(
                declaration = %analysis.qualified_name(),
                functions = analysis.functions.len(),
                properties = analysis.properties.len(),
                "analyzed declaration"
            );
            ctx.analyses.insert(analysis.qualified_name(), analysis);
        }

        Ok(())
    }
}

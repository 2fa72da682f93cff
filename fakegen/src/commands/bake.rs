use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use fakegen_manifest::Manifest;

use super::{UnwrapOrExit, resolve_output};
use crate::{
    ops::{self, BakeOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct BakeCommand {
    /// Path to fakes.toml (defaults to ./fakes.toml)
    #[arg(short, long, default_value = "fakes.toml")]
    pub config: PathBuf,

    /// Output directory (overrides the manifest's project.output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Regenerate every declaration, ignoring the generation cache
    #[arg(long)]
    pub no_cache: bool,

    /// Write per-phase pipeline snapshots to <output>/.fakegen/debug
    #[arg(long)]
    pub visualize: bool,
}

impl BakeCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let output_dir = match &self.output {
            Some(output) => output.clone(),
            None => resolve_output(&self.config, &manifest.project.output),
        };

        let report = ops::bake(
            &manifest,
            BakeOptions {
                output_dir: &output_dir,
                dry_run: self.dry_run,
                visualize: self.visualize,
                use_cache: manifest.project.cache && !self.no_cache,
            },
        )?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}

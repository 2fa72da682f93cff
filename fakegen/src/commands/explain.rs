use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use fakegen_manifest::Manifest;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Path to fakes.toml (defaults to ./fakes.toml)
    #[arg(short, long, default_value = "fakes.toml")]
    pub config: PathBuf,

    /// Only explain this declaration (simple or qualified name)
    pub declaration: Option<String>,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let report = ops::explain(&manifest, &self.config, self.declaration.as_deref())?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}

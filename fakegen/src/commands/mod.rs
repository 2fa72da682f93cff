mod bake;
mod check;
mod completions;
mod explain;

use std::path::{Path, PathBuf};

use bake::BakeCommand;
use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use explain::ExplainCommand;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for fakegen_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Output directory of a manifest, resolved against the manifest's directory.
pub(crate) fn resolve_output(config: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        return output.to_path_buf();
    }
    match config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(output),
        _ => output.to_path_buf(),
    }
}

#[derive(Parser)]
#[command(name = "fakegen")]
#[command(version)]
#[command(about = "Generate configurable Kotlin fakes from fakes.toml")]
pub(crate) struct Cli {
    /// Log pipeline progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Bake(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Explain(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }

    /// Install the stderr log subscriber.
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fakes from fakes.toml
    Bake(BakeCommand),

    /// Validate fakes.toml without generating code
    Check(CheckCommand),

    /// Show how each declaration will be faked
    Explain(ExplainCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbose_flag() {
        let cli = Cli::parse_from(["fakegen", "check", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_resolve_output() {
        assert_eq!(
            resolve_output(Path::new("app/fakes.toml"), Path::new("build/fakes")),
            PathBuf::from("app/build/fakes")
        );
        assert_eq!(
            resolve_output(Path::new("fakes.toml"), Path::new("build/fakes")),
            PathBuf::from("build/fakes")
        );
    }
}

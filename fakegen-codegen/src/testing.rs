//! Test utilities for fake generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use eyre::{Result, eyre};
use fakegen_ir::DeclarationAnalysis;
use fakegen_manifest::Manifest;

use crate::pipeline::{CompilationContext, Pipeline};

/// Error from compiling or running generated code.
#[derive(Debug)]
pub struct CompileError {
    pub message: String,
    pub output: String,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n\nOutput:\n{}", self.message, self.output)
    }
}

impl std::error::Error for CompileError {}

/// Trait for verifying generated code compiles.
pub trait CompileChecker {
    /// Check that the code in the given directory compiles.
    fn check(&self, dir: &Path) -> Result<(), CompileError>;
}

/// Kotlin compile checker using `kotlinc`, and runner using `kotlin`.
///
/// Generated fakes reference the user's declarations and
/// `kotlinx.coroutines`, so the classpath must provide both. Classes are
/// compiled into `out/` inside the checked directory.
pub struct KotlinChecker {
    classpath: Option<String>,
}

impl KotlinChecker {
    pub fn new() -> Self {
        Self { classpath: None }
    }

    /// Use the classpath in `FAKEGEN_KOTLIN_CLASSPATH`, if set.
    pub fn from_env() -> Self {
        Self {
            classpath: std::env::var("FAKEGEN_KOTLIN_CLASSPATH").ok(),
        }
    }

    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = Some(classpath.into());
        self
    }

    /// Compile `dir`, then run `main_class` and return its stdout.
    ///
    /// A program reports failure by exiting non-zero, e.g. from a failed
    /// `check(...)` or an uncaught exception.
    pub fn run(&self, dir: &Path, main_class: &str) -> Result<String, CompileError> {
        self.check(dir)?;

        let mut entries = vec![dir.join("out")];
        if let Some(classpath) = &self.classpath {
            entries.extend(std::env::split_paths(classpath));
        }
        let classpath = std::env::join_paths(entries).map_err(|e| CompileError {
            message: format!("Invalid classpath: {}", e),
            output: String::new(),
        })?;

        let output = Command::new("kotlin")
            .arg("-classpath")
            .arg(&classpath)
            .arg(main_class)
            .current_dir(dir)
            .output()
            .map_err(|e| CompileError {
                message: format!("Failed to run kotlin: {}", e),
                output: String::new(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CompileError {
                message: format!("{} failed with {}", main_class, output.status),
                output: format!("stderr:\n{}\n\nstdout:\n{}", stderr, stdout),
            })
        }
    }
}

impl Default for KotlinChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileChecker for KotlinChecker {
    fn check(&self, dir: &Path) -> Result<(), CompileError> {
        let sources = kotlin_sources(dir).map_err(|e| CompileError {
            message: format!("Failed to collect Kotlin sources: {}", e),
            output: String::new(),
        })?;

        let mut command = Command::new("kotlinc");
        if let Some(classpath) = &self.classpath {
            command.args(["-classpath", classpath]);
        }
        let output = command
            .args(&sources)
            .args(["-d", "out"])
            .current_dir(dir)
            .output()
            .map_err(|e| CompileError {
                message: format!("Failed to run kotlinc: {}", e),
                output: String::new(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            Err(CompileError {
                message: "kotlinc failed".to_string(),
                output: format!("stderr:\n{}\n\nstdout:\n{}", stderr, stdout),
            })
        }
    }
}

fn kotlin_sources(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "kt") {
                sources.push(path);
            }
        }
    }
    sources.sort();
    Ok(sources)
}

/// Parse a manifest and run the full pipeline on it.
pub fn compile_manifest(source: &str) -> Result<CompilationContext> {
    let manifest = Manifest::from_str(source).map_err(|e| eyre!("invalid manifest: {e}"))?;
    Pipeline::new().run(manifest)
}

/// Parse a manifest and return the analysis of one declaration.
pub fn analyze_declaration(source: &str, qualified: &str) -> Result<DeclarationAnalysis> {
    let manifest = Manifest::from_str(source).map_err(|e| eyre!("invalid manifest: {e}"))?;
    let mut ctx = Pipeline::new().check(manifest)?;
    ctx.analyses
        .shift_remove(qualified)
        .ok_or_else(|| eyre!("no declaration named {qualified}"))
}

/// Assert that two strings are equal, with a nice diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {}\n", exp));
                diff.push_str(&format!("  actual:   {}\n", act));
            }
        }

        panic!("Content mismatch:\n{}", diff);
    }
}

/// Generate code into a temporary directory and return the path.
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub fn generate_to_temp<F>(generate: F) -> Result<tempfile::TempDir>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let temp_dir = tempfile::TempDir::new()?;
    generate(temp_dir.path())?;
    Ok(temp_dir)
}

/// Helper to run a generator and check that its output compiles.
pub fn assert_generates_valid_code<C>(
    generate: impl FnOnce(&Path) -> Result<()>,
    checker: &C,
) -> Result<()>
where
    C: CompileChecker,
{
    let temp_dir = generate_to_temp(generate)?;

    checker.check(temp_dir.path()).map_err(|e| {
        print_sources(temp_dir.path());
        eyre!("Compile check failed: {}", e)
    })?;

    Ok(())
}

/// Helper to compile generated code together with a `main` and run it.
///
/// Returns what the program printed.
pub fn assert_generated_program_runs(
    generate: impl FnOnce(&Path) -> Result<()>,
    checker: &KotlinChecker,
    main_class: &str,
) -> Result<String> {
    let temp_dir = generate_to_temp(generate)?;

    checker.run(temp_dir.path(), main_class).map_err(|e| {
        print_sources(temp_dir.path());
        eyre!("Run failed: {}", e)
    })
}

/// Print every Kotlin source under `dir` for debugging.
fn print_sources(dir: &Path) {
    eprintln!("Generated files in {}:", dir.display());
    let Ok(sources) = kotlin_sources(dir) else {
        return;
    };
    for source in sources {
        eprintln!("  {}", source.display());
        if let Ok(content) = std::fs::read_to_string(&source) {
            for line in content.lines() {
                eprintln!("    | {}", line);
            }
        }
    }
}

//! File registration for generated output.
//!
//! Generators register every file they produce, then preview or write the
//! whole set at once.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = FileRegistry::new();
//! registry.register(FileEntry::generated("com/example/FakeRepoImpl.kt", source));
//! let stats = registry.write_all(&output_dir)?;
//! ```

use std::path::Path;

use eyre::Result;
use fakegen_core::{File, FileRules, GeneratedFile, Overwrite, WriteResult};

/// An entry in the file registry representing a file to be generated.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Relative path from output directory.
    pub path: String,
    /// File content, header included.
    pub content: String,
    pub overwrite: Overwrite,
}

impl FileEntry {
    /// A generated source file, rewritten only when its content changed.
    pub fn generated(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: Overwrite::IfChanged,
        }
    }

    /// Create from a GeneratedFile, respecting its rules.
    pub fn from_generated<F: GeneratedFile>(path: impl Into<String>, file: &F) -> Self {
        Self {
            path: path.into(),
            content: file.contents(),
            overwrite: file.rules().overwrite,
        }
    }

    /// Write this file to disk.
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        File::new(base.join(&self.path), self.content.as_str())
            .with_rules(FileRules {
                overwrite: self.overwrite,
                header: None,
            })
            .write()
    }
}

/// Registry for collecting and managing generated files.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file entry.
    pub fn register(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Preview all files without writing.
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries
            .iter()
            .map(|e| PreviewEntry {
                path: e.path.clone(),
                content: e.content.clone(),
            })
            .collect()
    }

    /// Write all files to the output directory.
    pub fn write_all(&self, output_dir: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();
        for entry in &self.entries {
            match entry.write(output_dir)? {
                WriteResult::Written => stats.written.push(entry.path.clone()),
                WriteResult::Unchanged => stats.unchanged.push(entry.path.clone()),
            }
        }
        Ok(stats)
    }
}

/// A preview entry (path and content).
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub path: String,
    pub content: String,
}

/// Statistics from writing files.
#[derive(Debug, Default)]
pub struct WriteStats {
    /// Files written to disk.
    pub written: Vec<String>,
    /// Files whose content on disk was already identical.
    pub unchanged: Vec<String>,
}

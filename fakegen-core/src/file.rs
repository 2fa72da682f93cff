use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules;

    /// Render the file body (without the header comment)
    fn render(&self) -> String;

    /// Render the full file content, header included
    fn contents(&self) -> String {
        with_header(self.rules().header.as_deref(), &self.render())
    }

    /// Write the file to disk
    fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.path(base);
        let rules = self.rules();

        match rules.overwrite {
            Overwrite::Always => {
                write_file(&path, &self.contents())?;
                Ok(WriteResult::Written)
            }
            Overwrite::IfChanged => {
                let contents = self.contents();
                if std::fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
                    Ok(WriteResult::Unchanged)
                } else {
                    write_file(&path, &contents)?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

fn with_header(header: Option<&str>, body: &str) -> String {
    match header {
        Some(header) => {
            let mut out = String::new();
            for line in header.lines() {
                out.push_str("// ");
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(body);
            out
        }
        None => body.to_string(),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had identical content
    Unchanged,
}

/// A file to be generated
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Set the rules used when writing
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        let contents = with_header(self.rules.header.as_deref(), &self.content);
        match self.rules.overwrite {
            Overwrite::Always => {
                write_file(&self.path, &contents)?;
                Ok(WriteResult::Written)
            }
            Overwrite::IfChanged => {
                if std::fs::read_to_string(&self.path).is_ok_and(|existing| existing == contents) {
                    Ok(WriteResult::Unchanged)
                } else {
                    write_file(&self.path, &contents)?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    pub overwrite: Overwrite,
    /// Comment lines emitted at the top of the file
    pub header: Option<String>,
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite
    #[default]
    Always,
    /// Leave the file alone when the content is identical (keeps mtimes stable)
    IfChanged,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("com").join("example").join("FakeImpl.kt");

        write_file(&path, "nested").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_file_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        fs::write(&path, "original").unwrap();

        let file = File::new(&path, "updated");
        let result = file.write().unwrap();

        assert_eq!(result, WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn test_file_write_if_changed_skips_identical() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("same.txt");

        let file = File::new(&path, "same content").with_rules(FileRules {
            overwrite: Overwrite::IfChanged,
            header: None,
        });
        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert_eq!(file.write().unwrap(), WriteResult::Unchanged);
    }

    #[test]
    fn test_header_is_prefixed_as_comments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("header.kt");

        let file = File::new(&path, "package a\n").with_rules(FileRules {
            overwrite: Overwrite::Always,
            header: Some("Generated by fakegen.\nDo not edit.".to_string()),
        });
        file.write().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "// Generated by fakegen.\n// Do not edit.\npackage a\n"
        );
    }

    #[test]
    fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        let file = File::new(&path, "content");
        assert!(!file.exists());

        fs::write(&path, "content").unwrap();
        assert!(file.exists());
    }
}

//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Declarations that passed analysis.
    pub declaration_count: usize,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.warning(&format!("error: {}", error));
        }

        for warning in &self.warnings {
            out.warning(&format!("warning: {}", warning));
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!(
                "✓ {} is valid ({} declarations)",
                self.config_path.display(),
                self.declaration_count
            ));
        } else {
            out.preformatted(&format!(
                "✗ {} has {} error(s)",
                self.config_path.display(),
                self.errors.len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::BufferOutput;

    #[test]
    fn test_invalid_report() {
        let report = CheckReport {
            config_path: PathBuf::from("fakes.toml"),
            declaration_count: 0,
            errors: vec!["cannot fake object 'Clock'".into()],
            warnings: Vec::new(),
            infos: Vec::new(),
        };
        assert!(!report.is_valid());

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            [
                "warning: error: cannot fake object 'Clock'",
                "",
                "✗ fakes.toml has 1 error(s)",
            ]
        );
    }
}

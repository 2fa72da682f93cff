//! Import collection for generated files.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::Serialize;

/// Tracks imports and deduplicates them.
///
/// Packages keep insertion order; symbols within a package are sorted.
///
/// The collector also owns the file's simple names. The first package to use
/// a simple name keeps it; a classifier from another package with the same
/// simple name must be written fully qualified (see [`claim`](Self::claim)).
///
/// # Example
///
/// ```
/// use fakegen_codegen::generation::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("kotlinx.coroutines.flow", "StateFlow");
/// imports.add_qualified("kotlinx.coroutines.flow.MutableStateFlow");
/// imports.add("com.example.model", "User");
///
/// let lines: Vec<String> = imports.statements().collect();
/// assert_eq!(lines[0], "import kotlinx.coroutines.flow.MutableStateFlow");
/// assert_eq!(lines.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImportCollector {
    /// Package -> set of symbols (sorted for deterministic output)
    imports: IndexMap<String, BTreeSet<String>>,
    /// Simple name -> package that owns it in this file
    #[serde(skip)]
    claims: BTreeMap<String, String>,
    /// `package.Name` of classifiers that lost their simple name
    #[serde(skip)]
    qualified: BTreeSet<String>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a package.
    pub fn add(&mut self, package: &str, symbol: &str) {
        self.claims
            .entry(symbol.to_string())
            .or_insert_with(|| package.to_string());
        self.imports
            .entry(package.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Claim the simple name `symbol` for `package`.
    ///
    /// Returns false when another package already owns the name. The symbol
    /// must then be written as `package.symbol` and not imported.
    pub fn claim(&mut self, package: &str, symbol: &str) -> bool {
        match self.claims.get(symbol) {
            Some(owner) if owner != package => {
                self.qualified.insert(format!("{package}.{symbol}"));
                false
            }
            Some(_) => true,
            None => {
                self.claims.insert(symbol.to_string(), package.to_string());
                true
            }
        }
    }

    /// Import `symbol` from `package` if its simple name is free.
    ///
    /// Returns the name to write in code: `symbol`, or `package.symbol` when
    /// the simple name belongs to another package.
    pub fn import_or_qualify(&mut self, package: &str, symbol: &str) -> String {
        if package.is_empty() {
            self.claim(package, symbol);
            symbol.to_string()
        } else if self.claim(package, symbol) {
            self.add(package, symbol);
            symbol.to_string()
        } else {
            format!("{package}.{symbol}")
        }
    }

    /// `package.Name` of every classifier that must be written fully qualified.
    pub fn qualified(&self) -> &BTreeSet<String> {
        &self.qualified
    }

    /// Add an import from a fully qualified name (`a.b.Symbol`).
    ///
    /// A name without a package is ignored; there is nothing to import.
    pub fn add_qualified(&mut self, qualified: &str) {
        if let Some((package, symbol)) = qualified.rsplit_once('.') {
            self.add(package, symbol);
        }
    }

    /// Add a package without specific symbols (a star import).
    pub fn add_package(&mut self, package: &str) {
        self.imports.entry(package.to_string()).or_default();
    }

    /// Merge another collector into this one.
    pub fn merge(&mut self, other: &ImportCollector) {
        for (package, symbols) in &other.imports {
            let entry = self.imports.entry(package.clone()).or_default();
            entry.extend(symbols.iter().cloned());
        }
        for (symbol, package) in &other.claims {
            self.claims
                .entry(symbol.clone())
                .or_insert_with(|| package.clone());
        }
        self.qualified.extend(other.qualified.iter().cloned());
    }

    /// Keep only the packages for which `keep` returns true.
    pub fn retain_packages(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.imports.retain(|package, _| keep(package));
    }

    /// Check if a package is already imported.
    pub fn has_package(&self, package: &str) -> bool {
        self.imports.contains_key(package)
    }

    /// Check if a specific symbol is imported from a package.
    pub fn has_symbol(&self, package: &str, symbol: &str) -> bool {
        self.imports
            .get(package)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Iterate over all imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Kotlin import statements, one per symbol (`import a.b.C`).
    ///
    /// A package without symbols renders as a star import.
    pub fn statements(&self) -> impl Iterator<Item = String> + '_ {
        self.imports.iter().flat_map(|(package, symbols)| {
            if symbols.is_empty() {
                vec![format!("import {package}.*")]
            } else {
                symbols
                    .iter()
                    .map(|symbol| format!("import {package}.{symbol}"))
                    .collect()
            }
        })
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Get the number of packages.
    pub fn len(&self) -> usize {
        self.imports.len()
    }
}

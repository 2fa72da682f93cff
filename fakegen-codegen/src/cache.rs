//! Generation cache.
//!
//! Each declaration is fingerprinted by hashing the canonical JSON encoding
//! of its [`DeclarationAnalysis`]. Anything else that changes generated text
//! (file header, shapes, generator version) goes into the cache-wide
//! settings hash, and a mismatch there drops every entry.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use fakegen_ir::{DeclarationAnalysis, ShapeCatalog};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Directory under the output directory that holds fakegen state.
pub const CACHE_DIR: &str = ".fakegen";
const CACHE_FILE: &str = "cache.json";

/// Fingerprint of one analyzed declaration.
pub fn fingerprint(analysis: &DeclarationAnalysis) -> Result<u64> {
    let bytes = serde_json::to_vec(analysis).wrap_err("failed to encode declaration analysis")?;
    Ok(xxh3_64(&bytes))
}

/// Hash of the settings every generated file depends on.
pub fn settings_hash(header: Option<&str>, shapes: &ShapeCatalog) -> Result<u64> {
    let shapes = serde_json::to_vec(shapes).wrap_err("failed to encode shapes")?;
    let mut bytes = header.unwrap_or_default().as_bytes().to_vec();
    bytes.push(0);
    bytes.extend_from_slice(&shapes);
    Ok(xxh3_64(&bytes))
}

/// A cached declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: u64,
    /// Generated file, relative to the output directory.
    pub file: String,
}

/// Fingerprints of previously generated declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationCache {
    version: String,
    settings: u64,
    entries: IndexMap<String, CacheEntry>,
}

impl GenerationCache {
    pub fn new(settings: u64) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings,
            entries: IndexMap::new(),
        }
    }

    /// Location of the cache file for an output directory.
    pub fn path(output_dir: &Path) -> PathBuf {
        output_dir.join(CACHE_DIR).join(CACHE_FILE)
    }

    /// Load the cache of `output_dir`.
    ///
    /// A missing or unreadable cache, or one written by another version or
    /// with other settings, yields an empty cache.
    pub fn load(output_dir: &Path, settings: u64) -> Self {
        let path = Self::path(output_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            debug!(path = %path.display(), "no generation cache");
            return Self::new(settings);
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(cache) if cache.version == env!("CARGO_PKG_VERSION") && cache.settings == settings => {
                debug!(entries = cache.entries.len(), "loaded generation cache");
                cache
            }
            Ok(_) => {
                debug!("generation cache invalidated by version or settings change");
                Self::new(settings)
            }
            Err(err) => {
                debug!(%err, "ignoring unreadable generation cache");
                Self::new(settings)
            }
        }
    }

    /// Whether `qualified` was generated from the same fingerprint and its
    /// file still exists.
    pub fn is_fresh(&self, qualified: &str, fingerprint: u64, output_dir: &Path) -> bool {
        self.entries.get(qualified).is_some_and(|entry| {
            entry.fingerprint == fingerprint && output_dir.join(&entry.file).exists()
        })
    }

    pub fn get(&self, qualified: &str) -> Option<&CacheEntry> {
        self.entries.get(qualified)
    }

    pub fn record(&mut self, qualified: impl Into<String>, fingerprint: u64, file: impl Into<String>) {
        self.entries.insert(
            qualified.into(),
            CacheEntry {
                fingerprint,
                file: file.into(),
            },
        );
    }

    /// Drop entries for declarations that no longer exist.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|name, _| keep(name));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache file.
    pub fn save(&self, output_dir: &Path) -> Result<()> {
        let path = Self::path(output_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).wrap_err("failed to encode cache")?;
        fs::write(&path, content).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), entries = self.entries.len(), "saved generation cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fakegen_ir::{FunctionAnalysis, MemberAnalysis, ResolvedType, TargetKind};
    use tempfile::TempDir;

    use super::*;

    fn analysis(return_type: &str) -> DeclarationAnalysis {
        DeclarationAnalysis::new("Counter", "com.example", TargetKind::Interface).with_member(
            MemberAnalysis::Function(FunctionAnalysis {
                name: "increment".to_string(),
                parameters: vec![],
                return_type: ResolvedType::builtin("kotlin", return_type),
                is_suspend: false,
                is_operator: false,
                is_infix: false,
                extension_receiver: None,
                type_parameters: vec![],
                is_abstract: true,
            }),
        )
    }

    #[test]
    fn test_fingerprint_is_structural() {
        // Separately built analyses have different occurrence ids
        assert_eq!(
            fingerprint(&analysis("Int")).unwrap(),
            fingerprint(&analysis("Int")).unwrap()
        );
        assert_ne!(
            fingerprint(&analysis("Int")).unwrap(),
            fingerprint(&analysis("Long")).unwrap()
        );
    }

    #[test]
    fn test_settings_hash_covers_header() {
        let shapes = ShapeCatalog::new();
        assert_ne!(
            settings_hash(None, &shapes).unwrap(),
            settings_hash(Some("// header"), &shapes).unwrap()
        );
    }

    #[test]
    fn test_roundtrip_and_freshness() {
        let dir = TempDir::new().unwrap();
        let fp = fingerprint(&analysis("Int")).unwrap();

        let mut cache = GenerationCache::new(7);
        cache.record("com.example.Counter", fp, "com/example/FakeCounterImpl.kt");
        cache.save(dir.path()).unwrap();

        let loaded = GenerationCache::load(dir.path(), 7);
        assert_eq!(loaded, cache);
        // The generated file is gone, so the entry is stale
        assert!(!loaded.is_fresh("com.example.Counter", fp, dir.path()));

        let file = dir.path().join("com/example/FakeCounterImpl.kt");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "class FakeCounterImpl").unwrap();
        assert!(loaded.is_fresh("com.example.Counter", fp, dir.path()));
        assert!(!loaded.is_fresh("com.example.Counter", fp + 1, dir.path()));
    }

    #[test]
    fn test_settings_change_invalidates() {
        let dir = TempDir::new().unwrap();
        let mut cache = GenerationCache::new(1);
        cache.record("com.example.Counter", 42, "FakeCounterImpl.kt");
        cache.save(dir.path()).unwrap();

        assert_eq!(GenerationCache::load(dir.path(), 1).len(), 1);
        assert!(GenerationCache::load(dir.path(), 2).is_empty());
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = GenerationCache::path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(GenerationCache::load(dir.path(), 0).is_empty());
    }
}

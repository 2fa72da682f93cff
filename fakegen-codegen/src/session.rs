//! Analysis session: the lifetime of every memo used during generation.
//!
//! A session is created when a compilation starts and dropped when it ends.
//! Memoized renders and generic pattern classifications never outlive it,
//! so tests can run against fresh sessions without sharing state.

use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use fakegen_ir::{GenericPattern, OccurrenceId, ShapeCatalog};

/// Hit/miss counters for the session memos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub render_hits: usize,
    pub render_misses: usize,
    pub classifications: usize,
    pub classification_hits: usize,
}

/// State shared by every analysis and build step of one compilation.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    shapes: ShapeCatalog,
    renders: RwLock<HashMap<(OccurrenceId, bool), String>>,
    patterns: RwLock<HashMap<String, GenericPattern>>,
    render_hits: AtomicUsize,
    render_misses: AtomicUsize,
    classifications: AtomicUsize,
    classification_hits: AtomicUsize,
}

impl AnalysisSession {
    /// Create a session without known data shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that knows the given data shapes.
    pub fn with_shapes(shapes: ShapeCatalog) -> Self {
        Self {
            shapes,
            ..Self::default()
        }
    }

    /// Data shapes available for default construction.
    pub fn shapes(&self) -> &ShapeCatalog {
        &self.shapes
    }

    /// Look up a memoized render.
    pub(crate) fn cached_render(&self, occurrence: OccurrenceId, preserve: bool) -> Option<String> {
        let renders = self.renders.read().unwrap_or_else(PoisonError::into_inner);
        let hit = renders.get(&(occurrence, preserve)).cloned();
        if hit.is_some() {
            self.render_hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Store a render. The first stored value for a key wins.
    pub(crate) fn store_render(&self, occurrence: OccurrenceId, preserve: bool, text: &str) {
        self.render_misses.fetch_add(1, Ordering::Relaxed);
        self.renders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((occurrence, preserve))
            .or_insert_with(|| text.to_string());
    }

    /// Return the memoized pattern for `key`, computing it with `classify` on a miss.
    pub(crate) fn pattern_or_insert_with(
        &self,
        key: &str,
        classify: impl FnOnce() -> GenericPattern,
    ) -> GenericPattern {
        if let Some(pattern) = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            self.classification_hits.fetch_add(1, Ordering::Relaxed);
            return *pattern;
        }

        self.classifications.fetch_add(1, Ordering::Relaxed);
        let pattern = classify();
        *self
            .patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_insert(pattern)
    }

    /// Whether the pattern for `key` was already classified in this session.
    pub fn is_classified(&self, key: &str) -> bool {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Snapshot of the memo counters.
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            render_hits: self.render_hits.load(Ordering::Relaxed),
            render_misses: self.render_misses.load(Ordering::Relaxed),
            classifications: self.classifications.load(Ordering::Relaxed),
            classification_hits: self.classification_hits.load(Ordering::Relaxed),
        }
    }
}

//! Analysis, default resolution and code structure building for fakegen.
//!
//! This crate turns the declarations of a `fakes.toml` manifest into
//! language-agnostic [`GeneratedCodeDocument`](document::GeneratedCodeDocument)s
//! that a backend (e.g., `fakegen-codegen-kotlin`) renders to source text.
//!
//! # Module Organization
//!
//! - [`analysis`] - Name resolution and the Member Analyzer
//! - [`render`] - Type Renderer with per-session memoization
//! - [`defaults`] - Default Value Resolver
//! - [`generics`] - Generic pattern classification and scoping strategies
//! - [`structure`] - Code Structure Builder
//! - [`document`] - The generated code document model
//! - [`naming`] - Generated names (the configuration join key)
//! - [`session`] - Per-compilation memo ownership
//! - [`pipeline`] - Phases, lints, diagnostics and plugins
//! - [`cache`] - Fingerprint-based generation cache
//! - [`builder`] - Code building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`generation`] - Output management (ImportCollector, FileRegistry)
//! - [`language`] - Language backend abstractions (LanguageCodegen)
//! - [`testing`] - Test utilities (feature-gated)

pub mod analysis;
pub mod builder;
pub mod cache;
pub mod defaults;
pub mod document;
pub mod generation;
pub mod generics;
pub mod language;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod structure;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

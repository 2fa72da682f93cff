//! Core utilities and types for fakegen.
//!
//! This crate provides fundamental helpers used across the fakegen
//! crates: identifier casing, Kotlin keyword handling and generated
//! file write rules.

mod file;
mod kotlin;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult};
// Kotlin identifier helpers
pub use kotlin::{KOTLIN_HARD_KEYWORDS, escape_identifier, is_hard_keyword, is_valid_identifier};
// String utilities
pub use utils::{capitalize, decapitalize, to_camel_case, to_pascal_case};

//! Parsing and validation of `fakes.toml`.
//!
//! The manifest describes the marked declarations handed over by the host
//! front end: their members, signatures (as Kotlin type expressions) and the
//! data shapes the generator may construct defaults for.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;
pub mod syntax;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use manifest::*;
pub use validate::ParseContext;

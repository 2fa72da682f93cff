//! Core operations.
//!
//! This module contains the business logic for fakegen commands,
//! separated from CLI argument parsing and output rendering.

pub mod bake;
pub mod check;
pub mod explain;

pub use bake::{BakeOptions, bake};
pub use check::check;
pub use explain::explain;

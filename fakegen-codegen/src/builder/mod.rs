//! Code building blocks for generated Kotlin.
//!
//! Document nodes describe themselves as [`CodeFragment`]s through
//! [`Renderable`]; a [`CodeBuilder`] writes fragments out with indentation.

mod code_builder;
mod fragment;

pub use code_builder::{CodeBuilder, KOTLIN_INDENT};
pub use fragment::{CodeFragment, Renderable};

//! Kotlin AST builders for generating classes and functions.
//!
//! These provide a high-level API for constructing Kotlin syntax,
//! which can then be rendered via CodeBuilder.

mod class;
mod fun;

pub use class::Class;
pub use fun::{Fun, Param};

//! Intermediate representation types for fakegen.
//!
//! This crate provides the data model shared by every stage of the
//! generator: resolved type occurrences, type parameters with their scope,
//! per-member analysis records and the per-declaration aggregate.
//!
//! # Architecture
//!
//! ```text
//! fakes.toml → fakegen-manifest (parsing) → fakegen-ir (analysis records) → codegen
//! ```
//!
//! The IR types are:
//! - Immutable once built (analysis never mutates a record after creation)
//! - Deterministically ordered (source declaration order)
//! - Serializable, so a declaration can be fingerprinted and snapshotted

mod declaration;
mod defaults;
mod params;
mod pattern;
mod shape;
mod types;

pub use declaration::{
    DeclarationAnalysis, FunctionAnalysis, Member, MemberAnalysis, ParameterAnalysis,
    PropertyAnalysis, TargetKind,
};
pub use defaults::{DefaultStrategy, DefaultValueExpression};
pub use params::{TypeBound, TypeParameterDescriptor, TypeParameterScope, Variance};
pub use pattern::GenericPattern;
pub use shape::{DataShape, ShapeCatalog, ShapeField};
pub use types::{
    Classifier, ClassifierOrigin, FunctionType, OccurrenceId, ResolvedType, TypeArgument, TypeKind,
};

//! Core types for the caseforge phone-case generator.
//!
//! This crate provides the foundational types used across all other caseforge crates:
//! - Phone model specifications and their invariants
//! - The built-in model catalog
//! - Case manufacturing parameters
//! - Error types

pub mod catalog;
pub mod errors;
pub mod params;
pub mod spec;

pub use catalog::*;
pub use errors::*;
pub use params::*;
pub use spec::*;

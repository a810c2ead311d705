//! # adopet-core
//!
//! Shared domain vocabulary for the AdoPet platform.
//!
//! This crate holds the small set of types that both the identity layer
//! and the rest of the platform speak: user roles and partner
//! institution kinds. It deliberately carries no I/O.

pub mod institution;
pub mod role;

pub use institution::InstitutionKind;
pub use role::Role;

//! Wayfare Core — shared domain model and abstractions.
//!
//! This crate defines the types every other crate depends on: the
//! experience entity and its fields, media references, the status tagged
//! union, the error taxonomy, and the `MarketplaceApi` client seam. It
//! contains no infrastructure code.

pub mod client;
pub mod error;
pub mod experience;
pub mod field;
pub mod list;
pub mod media;
pub mod status;

//! Product listing schemas.
//!
//! This crate holds the input side of the listing pipeline: the product
//! shape and the generation parameters that wrap it, implemented purely as
//! deterministic validation (no IO, no HTTP, no storage).

pub mod listing;

pub use listing::{Product, ProductCategory, ProductListingRequest, validate_input};

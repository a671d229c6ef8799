//! `listingforge-core`: validation building blocks shared by the listing schemas.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no logging setup):
//! field paths, the field-level error model, and readers that pull typed
//! values out of an untyped JSON tree while collecting every violation.

pub mod error;
pub mod fields;
pub mod id;
pub mod path;
pub mod value_object;

pub use error::{FieldError, FieldErrorKind, ValidationErrors, ValidationResult};
pub use fields::{CharBounds, ObjectReader};
pub use id::RunId;
pub use path::FieldPath;
pub use value_object::ValueObject;

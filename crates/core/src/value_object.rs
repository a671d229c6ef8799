//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Every schema
/// type in this workspace is one: fields are private, there are no setters,
/// and the only way to obtain an instance is a validating constructor that
/// either succeeds completely or returns errors.
///
/// ## Design Constraints
///
/// - **Clone**: values are copied, never shared mutably
/// - **PartialEq**: two values with the same fields are the same value
/// - **Debug**: values show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

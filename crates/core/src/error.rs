//! Field-level validation error model.

use serde::Serialize;
use thiserror::Error;

use crate::path::FieldPath;

/// Result type used by the schema validators.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Machine-readable tag for a single field violation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field is absent.
    Missing,
    NotAString,
    NotANumber,
    NotABoolean,
    NotAList,
    NotAnObject,
    /// String or list shorter than its lower bound.
    TooShort,
    /// String or list longer than its upper bound.
    TooLong,
    /// Number at or below its exclusive lower bound.
    TooSmall,
    /// Number above its upper bound.
    TooLarge,
    /// Value outside a closed set of choices.
    InvalidChoice,
    /// A custom predicate rejected an otherwise well-typed value.
    InvalidValue,
}

impl FieldErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::NotAString => "not_a_string",
            FieldErrorKind::NotANumber => "not_a_number",
            FieldErrorKind::NotABoolean => "not_a_boolean",
            FieldErrorKind::NotAList => "not_a_list",
            FieldErrorKind::NotAnObject => "not_an_object",
            FieldErrorKind::TooShort => "too_short",
            FieldErrorKind::TooLong => "too_long",
            FieldErrorKind::TooSmall => "too_small",
            FieldErrorKind::TooLarge => "too_large",
            FieldErrorKind::InvalidChoice => "invalid_choice",
            FieldErrorKind::InvalidValue => "invalid_value",
        }
    }
}

impl core::fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure: where, what, and which kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{path}: {message}")]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(path: FieldPath, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            kind,
        }
    }

    pub fn missing(path: FieldPath) -> Self {
        Self::new(path, FieldErrorKind::Missing, "Field required")
    }

    pub fn invalid_value(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, FieldErrorKind::InvalidValue, message)
    }
}

/// Ordered collection of every violation found in one validation pass.
///
/// Order follows the order in which fields are checked, so error lists are
/// stable across runs for the same input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} validation error(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// Finish a validation pass: `Ok(value)` only when nothing was collected.
    ///
    /// The value is built lazily so no typed instance exists for a failed pass.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> ValidationResult<T> {
        if !self.is_empty() {
            return Err(self);
        }
        match build() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = core::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

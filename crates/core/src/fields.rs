//! Typed field extraction from an untyped JSON tree.
//!
//! Readers never stop at the first problem: each accessor records its own
//! violation into the shared [`ValidationErrors`] and returns `None`, so a
//! caller can check every field in one pass and only assemble a typed value
//! when the pass came back clean.

use serde_json::{Map, Value};

use crate::error::{FieldError, FieldErrorKind, ValidationErrors};
use crate::path::FieldPath;

/// Inclusive bounds on a string's length, counted in Unicode scalar values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CharBounds {
    pub min: usize,
    pub max: Option<usize>,
}

impl CharBounds {
    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_most(max: usize) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Record a violation for `value` at `path`; returns whether it passed.
    pub fn check(&self, path: &FieldPath, value: &str, errors: &mut ValidationErrors) -> bool {
        let len = value.chars().count();
        if len < self.min {
            errors.push(FieldError::new(
                path.clone(),
                FieldErrorKind::TooShort,
                format!(
                    "String should have at least {} character{}",
                    self.min,
                    plural(self.min)
                ),
            ));
            return false;
        }
        if let Some(max) = self.max {
            if len > max {
                errors.push(FieldError::new(
                    path.clone(),
                    FieldErrorKind::TooLong,
                    format!("String should have at most {max} character{}", plural(max)),
                ));
                return false;
            }
        }
        true
    }
}

/// Record a violation if a list's length falls outside `[min, max]`.
pub fn check_item_count(
    path: &FieldPath,
    len: usize,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) -> bool {
    if len < min {
        errors.push(FieldError::new(
            path.clone(),
            FieldErrorKind::TooShort,
            format!("List should have at least {min} item{}, not {len}", plural(min)),
        ));
        return false;
    }
    if len > max {
        errors.push(FieldError::new(
            path.clone(),
            FieldErrorKind::TooLong,
            format!("List should have at most {max} item{}, not {len}", plural(max)),
        ));
        return false;
    }
    true
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Read-only view over one JSON object at a known path.
#[derive(Debug, Clone)]
pub struct ObjectReader<'v> {
    object: &'v Map<String, Value>,
    path: FieldPath,
}

impl<'v> ObjectReader<'v> {
    /// View `value` as an object, recording `not_an_object` if it isn't one.
    pub fn new(value: &'v Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self { object, path }),
            _ => {
                errors.push(FieldError::new(
                    path,
                    FieldErrorKind::NotAnObject,
                    "Input should be a JSON object",
                ));
                None
            }
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn field_path(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    /// Raw member lookup; `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&'v Value> {
        self.object.get(key)
    }

    /// Required nested object.
    pub fn object(&self, key: &str, errors: &mut ValidationErrors) -> Option<ObjectReader<'v>> {
        let path = self.field_path(key);
        match self.get(key) {
            None => {
                errors.push(FieldError::missing(path));
                None
            }
            Some(value) => ObjectReader::new(value, path, errors),
        }
    }

    /// Required string.
    pub fn string(&self, key: &str, errors: &mut ValidationErrors) -> Option<&'v str> {
        let path = self.field_path(key);
        match self.get(key) {
            None => {
                errors.push(FieldError::missing(path));
                None
            }
            Some(value) => as_str(value, path, errors),
        }
    }

    /// String with a default when the key is absent. `null` is still a type error.
    pub fn string_or(&self, key: &str, default: &str, errors: &mut ValidationErrors) -> Option<String> {
        match self.get(key) {
            None => Some(default.to_string()),
            Some(value) => as_str(value, self.field_path(key), errors).map(str::to_string),
        }
    }

    /// Optional string: absent and `null` both mean `Some(None)`.
    ///
    /// The outer `None` means a violation was recorded.
    pub fn optional_string(&self, key: &str, errors: &mut ValidationErrors) -> Option<Option<&'v str>> {
        match self.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => as_str(value, self.field_path(key), errors).map(Some),
        }
    }

    /// Required number.
    ///
    /// Integers are widened. A string is accepted when it parses as a
    /// number after trimming (`"89.99"`), and booleans count as 0 or 1.
    /// Non-finite values are rejected.
    pub fn number(&self, key: &str, errors: &mut ValidationErrors) -> Option<f64> {
        let path = self.field_path(key);
        let parsed = match self.get(key) {
            None => {
                errors.push(FieldError::missing(path));
                return None;
            }
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            Some(_) => None,
        };
        match parsed {
            Some(v) if v.is_finite() => Some(v),
            _ => {
                errors.push(not_a_number(path));
                None
            }
        }
    }

    /// Boolean with a default when the key is absent.
    ///
    /// Besides JSON booleans, accepts the numbers 0 and 1 and the usual
    /// spellings (`yes`/`no`, `on`/`off`, `t`/`f`, ...) in any case.
    pub fn bool_or(&self, key: &str, default: bool, errors: &mut ValidationErrors) -> Option<bool> {
        let parsed = match self.get(key) {
            None => return Some(default),
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => parse_bool_word(s),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v == 0.0 => Some(false),
                Some(v) if v == 1.0 => Some(true),
                _ => None,
            },
            Some(_) => None,
        };
        if parsed.is_none() {
            errors.push(FieldError::new(
                self.field_path(key),
                FieldErrorKind::NotABoolean,
                "Input should be a valid boolean",
            ));
        }
        parsed
    }

    /// Required list of strings. Every element is checked; element errors
    /// carry indexed paths (`features[2]`).
    pub fn string_list(&self, key: &str, errors: &mut ValidationErrors) -> Option<Vec<&'v str>> {
        let path = self.field_path(key);
        let items = match self.get(key) {
            None => {
                errors.push(FieldError::missing(path));
                return None;
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                errors.push(FieldError::new(
                    path,
                    FieldErrorKind::NotAList,
                    "Input should be a valid list",
                ));
                return None;
            }
        };

        let before = errors.len();
        let strings: Vec<&'v str> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| as_str(item, path.index(idx), errors))
            .collect();

        if errors.len() == before { Some(strings) } else { None }
    }
}

fn as_str<'v>(value: &'v Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<&'v str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        _ => {
            errors.push(FieldError::new(
                path,
                FieldErrorKind::NotAString,
                "Input should be a valid string",
            ));
            None
        }
    }
}

/// Case-insensitive truthy and falsy spellings:
/// `true`/`false`, `t`/`f`, `yes`/`no`, `y`/`n`, `on`/`off`, `1`/`0`.
fn parse_bool_word(word: &str) -> Option<bool> {
    const TRUE: [&str; 6] = ["1", "on", "t", "true", "y", "yes"];
    const FALSE: [&str; 6] = ["0", "off", "f", "false", "n", "no"];
    if TRUE.iter().any(|w| word.eq_ignore_ascii_case(w)) {
        Some(true)
    } else if FALSE.iter().any(|w| word.eq_ignore_ascii_case(w)) {
        Some(false)
    } else {
        None
    }
}

fn not_a_number(path: FieldPath) -> FieldError {
    FieldError::new(path, FieldErrorKind::NotANumber, "Input should be a valid number")
}

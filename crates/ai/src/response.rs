use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use listingforge_core::fields::check_item_count;
use listingforge_core::{CharBounds, FieldPath, ObjectReader, ValidationErrors, ValidationResult, ValueObject};

/// A validated listing produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelResponse {
    title: String,
    description: String,
    features: Vec<String>,
    keywords: String,
}

impl ModelResponse {
    pub const TITLE_BOUNDS: CharBounds = CharBounds::between(10, 100);
    pub const DESCRIPTION_BOUNDS: CharBounds = CharBounds::between(100, 1000);
    pub const KEYWORDS_BOUNDS: CharBounds = CharBounds::at_least(10);
    pub const MIN_FEATURES: usize = 3;
    pub const MAX_FEATURES: usize = 10;

    /// Check an already-parsed reply against the listing schema.
    pub fn validate(raw: &Value) -> ValidationResult<ModelResponse> {
        let mut errors = ValidationErrors::new();
        let response = ObjectReader::new(raw, FieldPath::root(), &mut errors)
            .and_then(|reader| Self::read(&reader, &mut errors));
        errors.finish(|| response)
    }

    fn read(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<Self> {
        let title = bounded_string(reader, "title", Self::TITLE_BOUNDS, errors);
        let description = bounded_string(reader, "description", Self::DESCRIPTION_BOUNDS, errors);
        let features = reader.string_list("features", errors).and_then(|items| {
            check_item_count(
                &reader.field_path("features"),
                items.len(),
                Self::MIN_FEATURES,
                Self::MAX_FEATURES,
                errors,
            )
            .then(|| items.into_iter().map(str::to_string).collect::<Vec<_>>())
        });
        let keywords = bounded_string(reader, "keywords", Self::KEYWORDS_BOUNDS, errors);

        Some(Self {
            title: title?,
            description: description?,
            features: features?,
            keywords: keywords?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl ValueObject for ModelResponse {}

fn bounded_string(
    reader: &ObjectReader<'_>,
    key: &str,
    bounds: CharBounds,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = reader.string(key, errors)?;
    bounds
        .check(&reader.field_path(key), value, errors)
        .then(|| value.to_string())
}

/// Why a model reply was rejected.
///
/// The two cases need different remediation: malformed text calls for a
/// re-prompt, a schema violation for rejecting the listing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutputError {
    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response does not match the listing schema: {0}")]
    SchemaViolation(ValidationErrors),
}

impl OutputError {
    /// Field errors, when the reply parsed but had the wrong shape.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            OutputError::MalformedJson(_) => None,
            OutputError::SchemaViolation(errors) => Some(errors),
        }
    }
}

/// Parse sanitized reply text and validate it as a [`ModelResponse`].
pub fn validate_output(text: &str) -> Result<ModelResponse, OutputError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| OutputError::MalformedJson(e.to_string()))?;
    ModelResponse::validate(&value).map_err(OutputError::SchemaViolation)
}

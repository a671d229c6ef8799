use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use listingforge_core::{FieldError, ValidationErrors};
use listingforge_products::ProductListingRequest;

use crate::pipeline::PipelineState;
use crate::response::{ModelResponse, OutputError};

/// Wire tag identifying how a pipeline run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Success,
    InputValidationFailed,
    #[serde(rename = "chatgpt_failed")]
    ModelCallFailed,
    OutputValidationFailed,
}

impl PipelineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Success => "success",
            PipelineStatus::InputValidationFailed => "input_validation_failed",
            PipelineStatus::ModelCallFailed => "chatgpt_failed",
            PipelineStatus::OutputValidationFailed => "output_validation_failed",
        }
    }
}

impl core::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of one pipeline run.
///
/// Every variant carries enough to tell which stage stopped the run and
/// why. Serializes to the report shape callers print or store:
///
/// ```json
/// {"status": "success", "input": {...}, "output": {...}, "message": "..."}
/// {"status": "output_validation_failed", "error": "...", "raw_response": "..."}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Success {
        input: ProductListingRequest,
        output: ModelResponse,
    },
    InputValidationFailed {
        errors: ValidationErrors,
    },
    ModelCallFailed {
        /// Rendered [`crate::ModelError`]; the variant itself is not kept.
        reason: String,
    },
    OutputValidationFailed {
        error: OutputError,
        /// Reply text exactly as the model returned it.
        raw_response: String,
    },
}

const SUCCESS_MESSAGE: &str = "Complete pipeline successful with validation at every step";

impl PipelineResult {
    pub fn status(&self) -> PipelineStatus {
        match self {
            PipelineResult::Success { .. } => PipelineStatus::Success,
            PipelineResult::InputValidationFailed { .. } => PipelineStatus::InputValidationFailed,
            PipelineResult::ModelCallFailed { .. } => PipelineStatus::ModelCallFailed,
            PipelineResult::OutputValidationFailed { .. } => PipelineStatus::OutputValidationFailed,
        }
    }

    /// The state machine state this result was produced from.
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineResult::Success { .. } => PipelineState::Success,
            PipelineResult::InputValidationFailed { .. } => PipelineState::InputInvalid,
            PipelineResult::ModelCallFailed { .. } => PipelineState::ModelCallFailed,
            PipelineResult::OutputValidationFailed { .. } => PipelineState::OutputInvalid,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    /// Human-readable reason for a failed run; `None` on success.
    pub fn error_message(&self) -> Option<String> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::InputValidationFailed { errors } => {
                Some(format!("Input data invalid ({} field error(s))", errors.len()))
            }
            PipelineResult::ModelCallFailed { reason } => {
                Some(format!("ChatGPT API call failed: {reason}"))
            }
            PipelineResult::OutputValidationFailed { error, .. } => {
                Some(format!("ChatGPT response invalid: {error}"))
            }
        }
    }

    /// Field-level errors from whichever validator rejected the run.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PipelineResult::InputValidationFailed { errors } => Some(errors),
            PipelineResult::OutputValidationFailed { error, .. } => error.field_errors(),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            PipelineResult::OutputValidationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a ProductListingRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a ModelResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<&'a str>,
}

impl Serialize for PipelineResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (input, output) = match self {
            PipelineResult::Success { input, output } => (Some(input), Some(output)),
            _ => (None, None),
        };

        Report {
            status: self.status(),
            input,
            output,
            message: self.is_success().then_some(SUCCESS_MESSAGE),
            error: self.error_message(),
            errors: self.field_errors().map(ValidationErrors::as_slice),
            raw_response: self.raw_response(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listingforge_core::{FieldErrorKind, FieldPath};
    use serde_json::json;

    #[test]
    fn status_tags_match_wire_names() {
        for status in [
            PipelineStatus::Success,
            PipelineStatus::InputValidationFailed,
            PipelineStatus::ModelCallFailed,
            PipelineStatus::OutputValidationFailed,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }

    #[test]
    fn input_failure_report_lists_field_errors() {
        let errors = ValidationErrors::from(FieldError::new(
            FieldPath::root().key("product").key("price"),
            FieldErrorKind::TooSmall,
            "Input should be greater than 0",
        ));
        let report = PipelineResult::InputValidationFailed { errors }.to_json();

        assert_eq!(report["status"], json!("input_validation_failed"));
        assert_eq!(report["errors"][0]["path"], json!("product.price"));
        assert_eq!(report["errors"][0]["kind"], json!("too_small"));
        assert!(report.get("raw_response").is_none());
        assert!(report.get("input").is_none());
    }

    #[test]
    fn model_failure_report_has_reason_and_no_raw_text() {
        let report = PipelineResult::ModelCallFailed {
            reason: "transport error: connection refused".to_string(),
        }
        .to_json();

        assert_eq!(report["status"], json!("chatgpt_failed"));
        assert_eq!(
            report["error"],
            json!("ChatGPT API call failed: transport error: connection refused")
        );
        assert!(report.get("raw_response").is_none());
        assert!(report.get("errors").is_none());
    }

    #[test]
    fn malformed_output_report_keeps_raw_text() {
        let result = PipelineResult::OutputValidationFailed {
            error: OutputError::MalformedJson("expected value at line 1 column 1".to_string()),
            raw_response: "not json at all".to_string(),
        };
        let report = result.to_json();

        assert_eq!(report["status"], json!("output_validation_failed"));
        assert_eq!(report["raw_response"], json!("not json at all"));
        assert!(report["error"].as_str().unwrap().starts_with("ChatGPT response invalid"));
        assert!(report.get("errors").is_none());
        assert_eq!(result.state(), PipelineState::OutputInvalid);
    }
}

use serde_json::Value;
use tracing::{info, info_span, warn};

use listingforge_core::RunId;
use listingforge_products::{ProductListingRequest, validate_input};

use crate::client::{ModelClient, ModelError, SamplingParams};
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::response::validate_output;
use crate::result::PipelineResult;
use crate::sanitize::sanitize;

/// States of one pipeline run.
///
/// ```text
/// Start -> InputValidated -> ModelCalled -> OutputValidated -> Success
///   |            |                |
///   v            v                v
/// InputInvalid  ModelCallFailed  OutputInvalid
/// ```
///
/// Transitions only move forward; no state is visited twice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Start,
    InputValidated,
    ModelCalled,
    OutputValidated,
    Success,
    InputInvalid,
    ModelCallFailed,
    OutputInvalid,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Success
                | PipelineState::InputInvalid
                | PipelineState::ModelCallFailed
                | PipelineState::OutputInvalid
        )
    }
}

/// validate input → call model → sanitize → validate output.
///
/// Holds no per-run state, so one pipeline can serve any number of runs,
/// including concurrent ones when the client allows it.
#[derive(Debug, Clone)]
pub struct ListingPipeline<C> {
    client: C,
    params: SamplingParams,
}

impl<C: ModelClient> ListingPipeline<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            params: SamplingParams::default(),
        }
    }

    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Run the full pipeline on an untyped JSON document.
    pub fn run(&self, raw: &Value) -> PipelineResult {
        let run_id = RunId::new();
        let span = info_span!("listing_pipeline", %run_id);
        let _guard = span.enter();

        info!(state = ?PipelineState::Start, "pipeline started");

        let request = match validate_input(raw) {
            Ok(request) => request,
            Err(errors) => {
                warn!(
                    state = ?PipelineState::InputInvalid,
                    error_count = errors.len(),
                    %errors,
                    "input validation failed"
                );
                return PipelineResult::InputValidationFailed { errors };
            }
        };

        self.generate(request)
    }

    /// Run the model stages for a request that has already been validated.
    pub fn run_validated(&self, request: ProductListingRequest) -> PipelineResult {
        let run_id = RunId::new();
        let span = info_span!("listing_pipeline", %run_id);
        let _guard = span.enter();

        self.generate(request)
    }

    fn generate(&self, request: ProductListingRequest) -> PipelineResult {
        info!(
            state = ?PipelineState::InputValidated,
            product = request.product().name(),
            price = request.product().price(),
            category = %request.product().category(),
            "input validated"
        );

        let reply = match self.call_model(&request) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(state = ?PipelineState::ModelCallFailed, error = %err, "model call failed");
                return PipelineResult::ModelCallFailed {
                    reason: err.to_string(),
                };
            }
        };
        info!(
            state = ?PipelineState::ModelCalled,
            reply_chars = reply.chars().count(),
            "model reply received"
        );

        let output = match validate_output(sanitize(&reply)) {
            Ok(output) => output,
            Err(error) => {
                warn!(state = ?PipelineState::OutputInvalid, %error, "output validation failed");
                return PipelineResult::OutputValidationFailed {
                    error,
                    raw_response: reply,
                };
            }
        };
        info!(
            state = ?PipelineState::OutputValidated,
            title = output.title(),
            features = output.features().len(),
            "output validated"
        );

        info!(state = ?PipelineState::Success, "pipeline succeeded");
        PipelineResult::Success {
            input: request,
            output,
        }
    }

    fn call_model(&self, request: &ProductListingRequest) -> Result<String, ModelError> {
        let prompt = build_prompt(request);
        let reply = self.client.complete(
            SYSTEM_PROMPT,
            &prompt,
            self.params.temperature(),
            self.params.max_tokens(),
        )?;
        if reply.trim().is_empty() {
            return Err(ModelError::EmptyReply);
        }
        Ok(reply)
    }
}

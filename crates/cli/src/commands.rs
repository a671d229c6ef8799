use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::{Value, json};
use tracing::info;

use listingforge_ai::{ListingPipeline, ModelClient, SYSTEM_PROMPT, SamplingParams, build_prompt};
use listingforge_infra::{ModelConfig, OpenAiClient, load_request_file};
use listingforge_products::validate_input;

use crate::report;

/// What a command wants printed, and whether it counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub success: bool,
}

impl CommandOutput {
    fn json(value: &Value, success: bool) -> Self {
        Self {
            stdout: format!("{value:#}"),
            success,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Path to a JSON listing request.
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to a JSON listing request.
    pub file: PathBuf,

    /// Model name (overrides OPENAI_MODEL).
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature in [0, 2].
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum reply length in tokens.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print a human-readable summary instead of JSON.
    #[arg(long)]
    pub summary: bool,
}

impl RunArgs {
    /// Layer command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: ModelConfig) -> anyhow::Result<ModelConfig> {
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        let sampling = SamplingParams::new(
            self.temperature.unwrap_or(config.sampling.temperature()),
            self.max_tokens.unwrap_or(config.sampling.max_tokens()),
        )
        .map_err(anyhow::Error::msg)
        .context("invalid sampling options")?;
        Ok(config.with_sampling(sampling))
    }
}

/// `listingforge run`: full pipeline against the configured model.
pub fn run(args: &RunArgs) -> anyhow::Result<CommandOutput> {
    let config = ModelConfig::from_env().context("loading model configuration")?;
    let config = args.apply(config)?;
    info!(model = %config.model, base_url = %config.base_url, "model client configured");

    let raw = load_request_file(&args.file)?;
    let client = OpenAiClient::new(&config).context("creating model client")?;

    Ok(run_value(client, config.sampling, &raw, args.summary))
}

/// Pipeline over an in-memory request with any client.
pub fn run_value<C: ModelClient>(
    client: C,
    sampling: SamplingParams,
    raw: &Value,
    summary: bool,
) -> CommandOutput {
    let result = ListingPipeline::new(client).with_params(sampling).run(raw);
    let success = result.is_success();

    if summary {
        CommandOutput {
            stdout: report::summary(&result),
            success,
        }
    } else {
        CommandOutput::json(&result.to_json(), success)
    }
}

/// `listingforge validate`: input validation only, no model call.
pub fn validate(args: &FileArgs) -> anyhow::Result<CommandOutput> {
    let raw = load_request_file(&args.file)?;
    Ok(validate_value(&raw))
}

pub fn validate_value(raw: &Value) -> CommandOutput {
    match validate_input(raw) {
        Ok(request) => CommandOutput::json(&json!({ "valid": true, "input": request.to_json() }), true),
        Err(errors) => CommandOutput::json(&json!({ "valid": false, "errors": errors }), false),
    }
}

/// `listingforge prompt`: show exactly what would be sent to the model.
pub fn prompt(args: &FileArgs) -> anyhow::Result<CommandOutput> {
    let raw = load_request_file(&args.file)?;
    Ok(prompt_value(&raw))
}

pub fn prompt_value(raw: &Value) -> CommandOutput {
    match validate_input(raw) {
        Ok(request) => CommandOutput {
            stdout: format!(
                "SYSTEM:\n{SYSTEM_PROMPT}\n\nUSER:\n{}",
                build_prompt(&request)
            ),
            success: true,
        },
        Err(errors) => CommandOutput::json(&json!({ "valid": false, "errors": errors }), false),
    }
}

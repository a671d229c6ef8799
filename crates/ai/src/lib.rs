//! `listingforge-ai`
//!
//! **Responsibility:** the model-facing half of the listing pipeline.
//!
//! - Builds the prompt from a validated request.
//! - Talks to a remote model only through the [`ModelClient`] trait; concrete
//!   transports live in `listingforge-infra`.
//! - Cleans and validates the model's reply.
//! - Sequences everything in [`ListingPipeline`], which never panics and
//!   always ends in a tagged [`PipelineResult`].

pub mod client;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod result;
pub mod sanitize;

pub use client::{ModelClient, ModelError, SamplingParams};
pub use pipeline::{ListingPipeline, PipelineState};
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use response::{ModelResponse, OutputError, validate_output};
pub use result::{PipelineResult, PipelineStatus};
pub use sanitize::sanitize;

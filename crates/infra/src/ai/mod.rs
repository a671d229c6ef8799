//! Model client adapters.
//!
//! Concrete transports for the `ModelClient` trait. Every failure is mapped
//! to a `ModelError`; nothing here panics on a bad reply.

pub mod openai;

pub use openai::OpenAiClient;

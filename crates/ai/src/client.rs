use thiserror::Error;

/// A remote text-generation model.
///
/// Implementations own their transport, credentials and timeouts. The
/// pipeline only sees text or a [`ModelError`]; it never retries.
pub trait ModelClient: Send + Sync {
    /// Send one system instruction plus one user prompt and return the raw reply text.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ModelError>;
}

impl<C: ModelClient + ?Sized> ModelClient for &C {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        (**self).complete(system_prompt, user_prompt, temperature, max_tokens)
    }
}

impl<C: ModelClient + ?Sized> ModelClient for Box<C> {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        (**self).complete(system_prompt, user_prompt, temperature, max_tokens)
    }
}

/// Any failure to obtain reply text from the model.
///
/// The pipeline collapses all variants into a single failure state; the
/// variants exist so logs can say what actually went wrong.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned an empty reply")]
    EmptyReply,

    #[error("unexpected reply format: {0}")]
    InvalidReply(String),
}

impl ModelError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    pub fn invalid_reply(msg: impl Into<String>) -> Self {
        Self::InvalidReply(msg.into())
    }
}

/// Sampling parameters sent with every completion request.
///
/// Only constructible through [`SamplingParams::new`], `Default` or the
/// `with_*` setters, so a value in hand is always within range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplingParams {
    temperature: f32,
    max_tokens: u32,
}

impl SamplingParams {
    pub const MAX_TEMPERATURE: f32 = 2.0;

    pub fn new(temperature: f32, max_tokens: u32) -> Result<Self, String> {
        Self::default()
            .with_temperature(temperature)?
            .with_max_tokens(max_tokens)
    }

    /// Sampling temperature in `[0, 2]`.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Upper bound on reply length, in tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, String> {
        if !(0.0..=Self::MAX_TEMPERATURE).contains(&temperature) {
            return Err(format!(
                "temperature must be within [0, {}], got {temperature}",
                Self::MAX_TEMPERATURE
            ));
        }
        self.temperature = temperature;
        Ok(self)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Result<Self, String> {
        if max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        self.max_tokens = max_tokens;
        Ok(self)
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl ModelClient for Echo {
        fn complete(&self, system: &str, user: &str, _: f32, _: u32) -> Result<String, ModelError> {
            Ok(format!("{system}|{user}"))
        }
    }

    #[test]
    fn references_and_boxes_are_clients() {
        let echo = Echo;
        assert_eq!((&echo).complete("s", "u", 0.7, 10).unwrap(), "s|u");

        let boxed: Box<dyn ModelClient> = Box::new(Echo);
        assert_eq!(boxed.complete("a", "b", 0.7, 10).unwrap(), "a|b");
    }

    #[test]
    fn default_sampling_matches_listing_generation() {
        let params = SamplingParams::default();
        assert_eq!(params.temperature(), 0.7);
        assert_eq!(params.max_tokens(), 500);
    }

    #[test]
    fn sampling_rejects_out_of_range_values() {
        assert!(SamplingParams::new(2.5, 100).is_err());
        assert!(SamplingParams::new(-0.1, 100).is_err());
        assert!(SamplingParams::new(f32::NAN, 100).is_err());
        assert!(SamplingParams::new(1.0, 0).is_err());
        assert!(SamplingParams::new(2.0, 1).is_ok());
        assert!(SamplingParams::new(0.0, 1).is_ok());
    }

    #[test]
    fn setters_keep_the_old_value_on_rejection() {
        let params = SamplingParams::default();
        assert!(params.with_temperature(9.0).is_err());
        assert!(params.with_max_tokens(0).is_err());
        assert_eq!(params, SamplingParams::default());

        let tuned = params.with_temperature(0.2).unwrap().with_max_tokens(64).unwrap();
        assert_eq!((tuned.temperature(), tuned.max_tokens()), (0.2, 64));
    }

    #[test]
    fn error_messages_carry_detail() {
        assert_eq!(
            ModelError::api(429, "rate limited").to_string(),
            "model API returned status 429: rate limited"
        );
        assert_eq!(
            ModelError::transport("connection refused").to_string(),
            "transport error: connection refused"
        );
    }
}

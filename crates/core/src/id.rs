//! Identifiers used for log correlation.

use uuid::Uuid;

/// Identifier of one pipeline run.
///
/// Runs are not persisted; the id only ties together the log lines emitted
/// while a single request moves through the pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new identifier (UUIDv7, time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

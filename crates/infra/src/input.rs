//! Reading listing requests from JSON files.
//!
//! Files are only parsed into a generic JSON tree here. Schema validation
//! is left to the pipeline so that it can report field errors uniformly.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read `path` and parse it as JSON.
pub fn load_request_file(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let value = parse_request(&text).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "request file loaded");
    Ok(value)
}

/// Parse in-memory JSON text.
pub fn parse_request(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures")
            .join(name)
    }

    #[test]
    fn loads_valid_fixture() {
        let value = load_request_file(fixture("valid_product.json")).unwrap();
        assert_eq!(value["product"]["name"], "Premium Coffee Maker");
        assert_eq!(value["product"]["price"], 89.99);
    }

    #[test]
    fn invalid_fixture_is_still_json() {
        let value = load_request_file(fixture("invalid_product.json")).unwrap();
        assert!(value["product"].is_object());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_request_file(fixture("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().contains("does_not_exist.json"));
    }

    #[test]
    fn broken_json_is_reported_with_path() {
        let err = load_request_file(fixture("broken.json")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}

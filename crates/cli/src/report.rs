//! Human-readable rendering of a pipeline result.

use std::fmt::Write;

use listingforge_ai::PipelineResult;

const DESCRIPTION_PREVIEW: usize = 100;
const RAW_PREVIEW: usize = 200;

/// First `n` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, n: usize) -> String {
    match text.char_indices().nth(n) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn summary(result: &PipelineResult) -> String {
    let mut out = String::new();

    match result {
        PipelineResult::Success { input, output } => {
            let _ = writeln!(out, "SUCCESS: listing generated for {}", input.product().name());
            let _ = writeln!(out);
            let _ = writeln!(out, "Title: {}", output.title());
            let _ = writeln!(out, "Description: {}", preview(output.description(), DESCRIPTION_PREVIEW));
            let _ = writeln!(out, "Features:");
            for (i, feature) in output.features().iter().enumerate() {
                let _ = writeln!(out, "  {}. {feature}", i + 1);
            }
            let _ = write!(out, "Keywords: {}", output.keywords());
        }
        failed => {
            let message = failed.error_message().unwrap_or_default();
            let _ = write!(out, "FAILED ({}): {message}", failed.status());
            if let Some(errors) = failed.field_errors() {
                for error in errors.iter() {
                    let _ = write!(out, "\n  - {}: {}", error.path, error.message);
                }
            }
            if let Some(raw) = failed.raw_response() {
                let _ = write!(out, "\nRaw response: {}", preview(raw, RAW_PREVIEW));
            }
        }
    }

    out
}

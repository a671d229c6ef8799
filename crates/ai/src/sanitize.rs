//! Code-fence stripping for model replies.
//!
//! Models often wrap JSON in a markdown fence even when told not to. Only
//! the two fixed opening markers below are recognised, and only when the
//! reply also ends with the closing fence; everything between the markers
//! is returned untouched.

const JSON_FENCE: &str = "```json";
const PLAIN_FENCE: &str = "```";

/// Strip a surrounding ```` ```json ```` or ```` ``` ```` fence from `raw`.
///
/// A reply that opens a fence but does not close it is returned unchanged,
/// so it reaches the JSON parser as-is and fails there with the full text.
pub fn sanitize(raw: &str) -> &str {
    strip_fence(raw, JSON_FENCE)
        .or_else(|| strip_fence(raw, PLAIN_FENCE))
        .unwrap_or(raw)
}

fn strip_fence<'a>(raw: &'a str, opening: &str) -> Option<&'a str> {
    raw.strip_prefix(opening)?.strip_suffix(PLAIN_FENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(sanitize(raw), "\n{\"title\": \"x\"}\n");
    }

    #[test]
    fn strips_plain_fence() {
        let raw = "```\n[1, 2]\n```";
        assert_eq!(sanitize(raw), "\n[1, 2]\n");
    }

    #[test]
    fn unfenced_text_is_unchanged() {
        for raw in ["{\"a\": 1}", "not json at all", "", " ```json\n{}\n```"] {
            assert_eq!(sanitize(raw), raw);
        }
    }

    #[test]
    fn unterminated_fence_is_unchanged() {
        let raw = "```json\n{\"a\": 1}\n";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn trailing_text_after_closing_fence_is_unchanged() {
        let raw = "```json\n{\"a\": 1}\n```\nHope this helps!";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn markers_are_not_counted_twice() {
        // A bare fence is both an opening and a closing marker; it cannot be both.
        assert_eq!(sanitize("```"), "```");
        assert_eq!(sanitize("``````"), "");
        assert_eq!(sanitize("```json```"), "");
    }

    #[test]
    fn body_backticks_survive() {
        let raw = "```json\n{\"code\": \"use ``` here\"}\n```";
        assert_eq!(sanitize(raw), "\n{\"code\": \"use ``` here\"}\n");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: fencing a body and sanitizing gives back exactly the body.
            #[test]
            fn removes_exactly_the_markers(body in "[^`]{0,64}") {
                let fenced = format!("```json{body}```");
                prop_assert_eq!(sanitize(&fenced), body.as_str());
            }

            /// Property: text that does not start with a fence is returned as-is.
            #[test]
            fn identity_without_fence(text in "[^`][\\s\\S]{0,64}") {
                prop_assert_eq!(sanitize(&text), text.as_str());
            }
        }
    }
}

//! Model code grammar.
//!
//! Packaging prints a short secondary code next to the barcode: five
//! alphanumerics, a hyphen, four alphanumerics (e.g. `JBB49-N7C5`). Matching
//! is purely lexical, so incidental text with the same shape is accepted.

use std::sync::LazyLock;

use regex::Regex;

static MODEL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{5}-[A-Z0-9]{4}").expect("valid model code pattern"));

/// Return the leftmost model code in `text`, if any.
pub fn find_model_code(text: &str) -> Option<&str> {
    MODEL_CODE.find(text).map(|m| m.as_str())
}

/// The part of a model code before the hyphen, used as a search key.
///
/// Codes without a hyphen are returned whole; blank input yields `None`.
pub fn model_code_prefix(code: &str) -> Option<&str> {
    let prefix = code.split('-').next().unwrap_or("").trim();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_code_inside_text() {
        assert_eq!(find_model_code("...JBB49-N7C5..."), Some("JBB49-N7C5"));
    }

    #[test]
    fn requires_hyphen() {
        assert_eq!(find_model_code("JBB49N7C5"), None);
    }

    #[test]
    fn leftmost_code_wins() {
        let text = "MADE IN MALAYSIA HCT12-0910\nFYC55-9A8B";
        assert_eq!(find_model_code(text), Some("HCT12-0910"));
    }

    #[test]
    fn is_case_sensitive() {
        assert_eq!(find_model_code("jbb49-n7c5"), None);
    }

    #[test]
    fn matches_inside_longer_runs() {
        // No word boundaries: the first five-four window is taken.
        assert_eq!(find_model_code("XJBB49-N7C5Z"), Some("JBB49-N7C5"));
    }

    #[test]
    fn empty_text_has_no_code() {
        assert_eq!(find_model_code(""), None);
    }

    #[test]
    fn prefix_is_text_before_hyphen() {
        assert_eq!(model_code_prefix("JBB49-N7C5"), Some("JBB49"));
        assert_eq!(model_code_prefix("JBB49"), Some("JBB49"));
        assert_eq!(model_code_prefix(""), None);
        assert_eq!(model_code_prefix("-N7C5"), None);
    }
}

//! Argument normalization and secret masking shared by the tool handlers

use serde_json::{Map, Value};

use crate::registry::CATEGORY_ALL;

pub const MASK_PLACEHOLDER: &str = "****";
pub const MASK_SEPARATOR: &str = "...";
pub const MASK_MIN_CHARS: usize = 12;
pub const MASK_VISIBLE_CHARS: usize = 4;
pub const CATEGORY_FILTER_VALUES: [&str; 5] = ["llm", "saas", "canva", "internal", CATEGORY_ALL];

/// Returns `key_name` when it is present and a string.
pub fn required_key_name(arguments: &Map<String, Value>) -> Option<&str> {
    arguments.get("key_name").and_then(Value::as_str)
}

/// Missing, non-string and empty categories all mean `"all"`.
pub fn normalize_category(arguments: &Map<String, Value>) -> &str {
    arguments
        .get("category")
        .and_then(Value::as_str)
        .filter(|category| !category.is_empty())
        .unwrap_or(CATEGORY_ALL)
}

/// Shows the first and last four characters of long values, hides short ones
/// entirely. Works on characters so multi-byte values never split.
pub fn mask_secret(value: &str) -> String {
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() < MASK_MIN_CHARS {
        return MASK_PLACEHOLDER.to_string();
    }

    let head = chars[..MASK_VISIBLE_CHARS].iter().collect::<String>();
    let tail = chars[chars.len() - MASK_VISIBLE_CHARS..]
        .iter()
        .collect::<String>();
    format!("{head}{MASK_SEPARATOR}{tail}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn arguments(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object arguments")
    }

    #[test]
    fn masks_long_values_with_head_and_tail() {
        assert_eq!(mask_secret("sk_live_abcdefghijkl1234"), "sk_l...1234");
        assert_eq!(mask_secret("abcdefghijkl"), "abcd...ijkl");
    }

    #[test]
    fn fully_masks_short_values() {
        assert_eq!(mask_secret("abcdefghijk"), "****");
        assert_eq!(mask_secret("x"), "****");
    }

    #[test]
    fn masking_counts_characters_not_bytes() {
        assert_eq!(mask_secret("ééééxxxxxxxxyyyy"), "éééé...yyyy");
        assert_eq!(mask_secret("éééééééééé"), "****");
    }

    #[test]
    fn key_name_must_be_a_string() {
        assert_eq!(
            required_key_name(&arguments(json!({"key_name": "openai"}))),
            Some("openai")
        );
        assert_eq!(required_key_name(&arguments(json!({"key_name": 7}))), None);
        assert_eq!(required_key_name(&arguments(json!({}))), None);
    }

    #[test]
    fn category_defaults_to_all() {
        assert_eq!(normalize_category(&arguments(json!({}))), "all");
        assert_eq!(normalize_category(&arguments(json!({"category": ""}))), "all");
        assert_eq!(normalize_category(&arguments(json!({"category": 3}))), "all");
        assert_eq!(
            normalize_category(&arguments(json!({"category": "canva"}))),
            "canva"
        );
    }
}

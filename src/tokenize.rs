//! Tokenization of free-form documentation text.

use regex::Regex;
use std::sync::LazyLock;

/// Words, backslash runs, runs of a single punctuation character, and the empty
/// bracket pairs `()`, `{}` and `[]`. Whitespace, commas and quote characters
/// separate tokens without ever becoming one.
static DOCSTRING_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[^\s,'"`.():\[\]=*;>{}+\-/\\]+|\\+|\.+|\(\)|\{\}|\[\]|\(+|\)+|:+|\[+|\]+|\{+|\}+|=+|\*+|;+|>+|\++|-+|/+"#,
    )
    .expect("docstring token pattern is valid")
});

/// Splits documentation text into tokens.
pub fn tokenize_docstring(text: &str) -> Vec<String> {
    DOCSTRING_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

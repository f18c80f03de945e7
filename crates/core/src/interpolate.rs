//! `{{name}}` template interpolation.
//!
//! Tokens are matched non-greedily, the key between the braces is trimmed
//! and looked up in a flat variable mapping. Unknown keys leave the token
//! untouched, braces included, so interpolation never fails.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::variables::Variables;

/// Regex pattern matching `{{ key }}` tokens.
pub const TOKEN_PATTERN: &str = r"\{\{(.*?)\}\}";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("valid regex"));

/// Substitute every resolvable `{{key}}` token in `text`.
///
/// Replacement values are inserted literally and never re-scanned, so a
/// value containing `{{other}}` is not expanded. With an empty mapping the
/// input is returned unchanged without scanning.
pub fn interpolate<'a>(text: &'a str, variables: &Variables) -> Cow<'a, str> {
    if text.is_empty() || variables.is_empty() {
        return Cow::Borrowed(text);
    }

    TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        let key = caps[1].trim();
        match variables.get(key) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        }
    })
}

/// List the distinct token keys in `text` that `variables` cannot resolve.
pub fn unresolved_keys(text: &str, variables: &Variables) -> Vec<String> {
    let mut keys: Vec<String> = TOKEN_RE
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|key| !variables.contains_key(key))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

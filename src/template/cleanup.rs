//! Removal of unresolved template syntax

use once_cell::sync::Lazy;
use regex::Regex;

/// Any `{{...}}` token that does not contain a closing brace
static LEFTOVER_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^}]*\}\}").expect("Valid regex pattern"));

const OPEN_DELIMITER: &str = "{{";

/// Delete every remaining `{{...}}` token, then any unmatched `{{`.
///
/// The result never contains `{{`.
pub fn remove_unresolved_tokens(template: &str) -> String {
    let mut result = LEFTOVER_TOKEN_REGEX.replace_all(template, "").into_owned();
    while result.contains(OPEN_DELIMITER) {
        result = result.replace(OPEN_DELIMITER, "");
    }
    result
}

//! Block directive resolvers
//!
//! Each resolver is a pure `&str -> String` pass over the output of the
//! previous one, matching its directive leftmost-first and non-overlapping
//! with a lazy body. The first closing tag always ends the block, so two
//! nested blocks of the same directive are not paired correctly: the outer
//! block ends at the inner closing tag and the stray outer closing tag is
//! left for the cleanup pass. Documents already in production depend on this,
//! so it is kept as-is.
//!
//! Pipeline order matters: `#if`/`#else` must run before the plain `#if`
//! resolver, otherwise the plain pattern would swallow the `{{#else}}` marker
//! as body text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use super::context::Context;

/// `{{#eq key "literal"}}body{{/eq}}`
static EQ_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)\{\{#eq\s+([A-Za-z0-9_]+)\s+"([^"]+)"\}\}(.*?)\{\{/eq\}\}"#)
        .expect("Valid regex pattern")
});

/// `{{#if key}}then{{#else}}otherwise{{/if}}`
static IF_ELSE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{#if\s+([A-Za-z0-9_]+)\}\}(.*?)\{\{#else\}\}(.*?)\{\{/if\}\}")
        .expect("Valid regex pattern")
});

/// `{{#if key}}body{{/if}}`
static IF_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{#if\s+([A-Za-z0-9_]+)\}\}(.*?)\{\{/if\}\}")
        .expect("Valid regex pattern")
});

/// `{{#unless key}}body{{/unless}}`
static UNLESS_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{#unless\s+([A-Za-z0-9_]+)\}\}(.*?)\{\{/unless\}\}")
        .expect("Valid regex pattern")
});

/// `{{#each key}}body{{/each}}`
static EACH_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{#each\s+([A-Za-z0-9_]+)\}\}(.*?)\{\{/each\}\}")
        .expect("Valid regex pattern")
});

const THIS_TOKEN: &str = "{{this}}";
const INDEX_TOKEN: &str = "{{@index}}";

/// Keep the body of every `#eq` block whose field equals the literal exactly.
///
/// Only text values can match; lists, undefined fields and absent keys never do.
pub fn resolve_equality_blocks(template: &str, context: &Context) -> String {
    EQ_BLOCK_REGEX
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            let expected = &caps[2];
            let matched = context
                .get(key)
                .and_then(|value| value.as_text())
                .is_some_and(|actual| actual == expected);

            trace!("#eq {} \"{}\" -> {}", key, expected, matched);
            if matched {
                caps[3].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Resolve two-branch `#if`/`#else` blocks by field truthiness.
pub fn resolve_if_else_blocks(template: &str, context: &Context) -> String {
    IF_ELSE_BLOCK_REGEX
        .replace_all(template, |caps: &Captures| {
            let truthy = context.is_truthy(&caps[1]);
            trace!("#if {} (with #else) -> {}", &caps[1], truthy);
            if truthy {
                caps[2].to_string()
            } else {
                caps[3].to_string()
            }
        })
        .into_owned()
}

/// Resolve single-branch `#if` blocks by field truthiness.
pub fn resolve_if_blocks(template: &str, context: &Context) -> String {
    IF_BLOCK_REGEX
        .replace_all(template, |caps: &Captures| {
            let truthy = context.is_truthy(&caps[1]);
            trace!("#if {} -> {}", &caps[1], truthy);
            if truthy {
                caps[2].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Keep the body of `#unless` blocks whose field is not truthy.
pub fn resolve_unless_blocks(template: &str, context: &Context) -> String {
    UNLESS_BLOCK_REGEX
        .replace_all(template, |caps: &Captures| {
            let truthy = context.is_truthy(&caps[1]);
            trace!("#unless {} -> {}", &caps[1], !truthy);
            if truthy {
                String::new()
            } else {
                caps[2].to_string()
            }
        })
        .into_owned()
}

/// Repeat each `#each` body once per list element.
///
/// `{{this}}` becomes the element and `{{@index}}` its zero-based position.
/// The body is not scanned again, so an inner `#each` is emitted as text.
pub fn expand_each_blocks(template: &str, context: &Context) -> String {
    EACH_BLOCK_REGEX
        .replace_all(template, |caps: &Captures| {
            let items = context
                .get(&caps[1])
                .map(|value| value.items())
                .unwrap_or_default();
            trace!("#each {} -> {} item(s)", &caps[1], items.len());

            let body = &caps[2];
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    body.replace(INDEX_TOKEN, &index.to_string())
                        .replace(THIS_TOKEN, item)
                })
                .collect::<String>()
        })
        .into_owned()
}

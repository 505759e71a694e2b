//! Static inspection of templates
//!
//! Advisory helpers used by editors and the CLI: structural validation,
//! listing the fields a template reads, and building a sample context for
//! previews. None of this runs during a render.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::context::{Context, Value};
use super::substitution::is_date_field;
use crate::date::today_local;

/// `{{#name ...}}`
static OPEN_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{#([A-Za-z0-9_]+)[^}]*\}\}").expect("Valid regex pattern"));

/// `{{/name}}`
static CLOSE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{/([A-Za-z0-9_]+)\}\}").expect("Valid regex pattern"));

/// An opening tag the renderer understands
static SUPPORTED_OPEN_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\{\{#(?:eq\s+[A-Za-z0-9_]+\s+"[^"]+"|(?:if|unless|each)\s+[A-Za-z0-9_]+|else)\}\}$"#,
    )
    .expect("Valid regex pattern")
});

/// Field references: plain variables, helpers and directive openers
static FIELD_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\{\{(?:#(?:if|unless|eq|each)\s+|(?:upper|lower|currency|number)\s+)?([A-Za-z0-9_]+)[^}]*\}\}",
    )
    .expect("Valid regex pattern")
});

/// `{{#each key}}`
static EACH_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{#each\s+([A-Za-z0-9_]+)\}\}").expect("Valid regex pattern")
});

const ELSE_MARKER: &str = "else";
const RESERVED_NAMES: [&str; 1] = ["this"];

/// Outcome of [`validate_template`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check that block directives are balanced and use supported syntax.
pub fn validate_template(template: &str) -> ValidationReport {
    let mut errors = Vec::new();
    let mut opened: BTreeMap<String, usize> = BTreeMap::new();
    let mut closed: BTreeMap<String, usize> = BTreeMap::new();

    for caps in OPEN_TAG_REGEX.captures_iter(template) {
        let token = &caps[0];
        if !SUPPORTED_OPEN_TAG_REGEX.is_match(token) {
            errors.push(format!("Unsupported directive syntax: {}", token));
        }
        if &caps[1] != ELSE_MARKER {
            *opened.entry(caps[1].to_string()).or_default() += 1;
        }
    }

    for caps in CLOSE_TAG_REGEX.captures_iter(template) {
        *closed.entry(caps[1].to_string()).or_default() += 1;
    }

    let total_opened: usize = opened.values().sum();
    let total_closed: usize = closed.values().sum();
    if total_opened != total_closed {
        errors.push(format!(
            "Opening and closing tags do not match: {} opening, {} closing",
            total_opened, total_closed
        ));
    }

    let names: IndexSet<&String> = opened.keys().chain(closed.keys()).collect();
    for name in names {
        let open_count = opened.get(name).copied().unwrap_or(0);
        let close_count = closed.get(name).copied().unwrap_or(0);
        if open_count != close_count {
            errors.push(format!(
                "'#{}' has {} opening tag(s) but {} closing tag(s)",
                name, open_count, close_count
            ));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Field names a template reads, in first-seen order, without duplicates.
pub fn extract_variables(template: &str) -> Vec<String> {
    let names: IndexSet<&str> = FIELD_REFERENCE_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !RESERVED_NAMES.contains(name))
        .collect();

    names.into_iter().map(str::to_string).collect()
}

/// A context with a plausible value for every field the template reads.
///
/// Fields iterated with `#each` get a two-element list.
pub fn sample_context(template: &str) -> Context {
    let iterated: IndexSet<&str> = EACH_OPEN_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    extract_variables(template)
        .into_iter()
        .map(|name| {
            let value = if iterated.contains(name.as_str()) {
                Value::List(vec![format!("{} 1", name), format!("{} 2", name)])
            } else {
                Value::Text(sample_value(&name))
            };
            (name, value)
        })
        .collect()
}

fn sample_value(name: &str) -> String {
    let lowered = name.to_lowercase();
    if is_date_field(name) {
        today_local()
    } else if lowered.contains("nome") {
        "Nome de Exemplo".to_string()
    } else if lowered.contains("endereco") {
        "Endereço de Exemplo, 123".to_string()
    } else if lowered.contains("valor") {
        "R$ 1.000,00".to_string()
    } else {
        format!("Exemplo {}", name)
    }
}

//! Render context: the flat field map a template is evaluated against
//!
//! Upstream form and contract code flattens its records into a [`Context`]
//! before calling the renderer. Keys are case-sensitive and values are either
//! text, a list of strings, or explicitly undefined ([`Value::Null`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::trace;

use crate::error::{MinutaError, Result};

/// A single context value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Field is known but has no value yet
    Null,
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// Non-blank text or a non-empty list
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Text(text) => !text.trim().is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Undefined, empty text, or an empty list.
    ///
    /// Whitespace-only text is *not* empty here even though it is not truthy.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.is_empty(),
            Value::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text used when the value is substituted directly into a document.
    /// Lists are joined with `", "`.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Text(text) => Cow::Borrowed(text),
            Value::List(items) => Cow::Owned(items.join(", ")),
        }
    }

    /// Elements to iterate over in an `#each` block.
    ///
    /// Text holding a JSON array is accepted as well, since multi-valued form
    /// fields are stored serialized.
    pub fn items(&self) -> Vec<String> {
        match self {
            Value::List(items) => items.clone(),
            Value::Text(text) => match serde_json::from_str::<serde_json::Value>(text) {
                Ok(serde_json::Value::Array(elements)) => {
                    elements.iter().map(scalar_to_string).collect()
                }
                _ => Vec::new(),
            },
            Value::Null => Vec::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Ordered, flat mapping from field name to [`Value`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    fields: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Truthiness of a field; absent keys are false
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a context from a single JSON object record.
    pub fn from_json(record: &serde_json::Value) -> Result<Self> {
        let mut context = Self::new();
        context.merge_json(record)?;
        Ok(context)
    }

    /// Merge a JSON object record into this context, overriding existing keys.
    ///
    /// Strings become text, numbers and booleans their display form, arrays
    /// become lists and `null` stays undefined. Nested objects are skipped.
    pub fn merge_json(&mut self, record: &serde_json::Value) -> Result<()> {
        let object = record.as_object().ok_or_else(|| {
            MinutaError::Context(format!(
                "expected a JSON object record, found {}",
                json_kind(record)
            ))
        })?;

        for (key, value) in object {
            let converted = match value {
                serde_json::Value::Null => Value::Null,
                serde_json::Value::String(text) => Value::Text(text.clone()),
                serde_json::Value::Number(_) | serde_json::Value::Bool(_) => {
                    Value::Text(scalar_to_string(value))
                }
                serde_json::Value::Array(elements) => {
                    Value::List(elements.iter().map(scalar_to_string).collect())
                }
                serde_json::Value::Object(_) => {
                    trace!("Skipping nested object field '{}'", key);
                    continue;
                }
            };
            self.fields.insert(key.clone(), converted);
        }

        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

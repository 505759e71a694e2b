//! Configuration for the `minuta` command
//!
//! Render options can come from a TOML file (`minuta.toml` in the working
//! directory by default), from `MINUTA_*` environment variables, and from
//! command-line flags, in increasing order of precedence.
//!
//! ```toml
//! [render]
//! clean_unused_placeholders = true
//! format_dates = true
//! missing_field_placeholder = "[CAMPO]"
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::template::RenderOptions;

pub use loader::{load_config, DEFAULT_CONFIG_FILE};

pub const ENV_CLEAN_UNUSED: &str = "MINUTA_CLEAN_UNUSED";
pub const ENV_FORMAT_DATES: &str = "MINUTA_FORMAT_DATES";
pub const ENV_MISSING_PLACEHOLDER: &str = "MINUTA_MISSING_PLACEHOLDER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinutaConfig {
    pub render: RenderOptions,
}

impl MinutaConfig {
    /// Apply `MINUTA_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|name| std::env::var(name).ok());
    }

    /// Apply `MINUTA_*` overrides using `lookup` to read variables
    pub fn merge_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_CLEAN_UNUSED) {
            match parse_flag(&value) {
                Some(enabled) => self.render.clean_unused_placeholders = enabled,
                None => warn!("Ignoring {}={:?}: expected a boolean", ENV_CLEAN_UNUSED, value),
            }
        }

        if let Some(value) = lookup(ENV_FORMAT_DATES) {
            match parse_flag(&value) {
                Some(enabled) => self.render.format_dates = enabled,
                None => warn!("Ignoring {}={:?}: expected a boolean", ENV_FORMAT_DATES, value),
            }
        }

        if let Some(placeholder) = lookup(ENV_MISSING_PLACEHOLDER) {
            self.render.missing_field_placeholder = placeholder;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Render options

use serde::{Deserialize, Serialize};

/// Placeholder written for undefined or empty fields
pub const DEFAULT_MISSING_FIELD_PLACEHOLDER: &str = "[CAMPO]";

/// Field that renders as nothing instead of the placeholder when empty
pub const SILENT_EMPTY_FIELD: &str = "observacao";

/// Options recognized by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Remove any `{{...}}` token left after substitution
    pub clean_unused_placeholders: bool,
    /// Localize values of fields whose name mentions `data` or `date`
    pub format_dates: bool,
    /// Text substituted for undefined or empty fields
    pub missing_field_placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            clean_unused_placeholders: true,
            format_dates: true,
            missing_field_placeholder: DEFAULT_MISSING_FIELD_PLACEHOLDER.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.clean_unused_placeholders = enabled;
        self
    }

    pub fn with_date_formatting(mut self, enabled: bool) -> Self {
        self.format_dates = enabled;
        self
    }

    pub fn with_missing_field_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_field_placeholder = placeholder.into();
        self
    }
}

//! Document template rendering
//!
//! A template is plain text with handlebars-style tokens. Rendering is a fixed
//! sequence of pure string passes, each consuming the previous one's output:
//!
//! 1. `{{#eq key "literal"}}...{{/eq}}`
//! 2. `{{#if key}}...{{#else}}...{{/if}}`
//! 3. `{{#if key}}...{{/if}}`
//! 4. `{{#unless key}}...{{/unless}}`
//! 5. `{{#each key}}...{{this}}...{{/each}}`
//! 6. `{{key}}` substitution (with field helpers and date localization)
//! 7. removal of any `{{...}}` still present (optional)
//!
//! Nothing is cached and no state survives a call, so renders may run
//! concurrently from any number of threads.
//!
//! # Examples
//!
//! ```
//! use minuta::template::{render, Context, RenderOptions};
//!
//! let template = r#"{{#eq tipo "residencial"}}Imóvel residencial. {{/eq}}Locatário: {{nome}}"#;
//! let context = Context::new()
//!     .with("tipo", "residencial")
//!     .with("nome", "Ana");
//!
//! let rendered = render(template, &context, &RenderOptions::default());
//! assert_eq!(rendered, "Imóvel residencial. Locatário: Ana");
//! ```

pub mod analysis;
pub mod cleanup;
pub mod context;
pub mod directives;
pub mod options;
pub mod substitution;

use std::sync::Arc;
use tracing::debug;

use crate::date::{BrazilianDateFormatter, DateFormatter};
use crate::error::Result;

pub use analysis::{extract_variables, sample_context, validate_template, ValidationReport};
pub use context::{Context, Value};
pub use options::{RenderOptions, DEFAULT_MISSING_FIELD_PLACEHOLDER};

/// Template renderer bound to a set of options and a date formatter
#[derive(Clone)]
pub struct Renderer {
    options: RenderOptions,
    formatter: Arc<dyn DateFormatter>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("formatter", &"<dyn DateFormatter>")
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    /// Create a renderer using the default Brazilian date formatter
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            formatter: Arc::new(BrazilianDateFormatter),
        }
    }

    /// Replace the date formatter
    pub fn with_date_formatter(mut self, formatter: impl DateFormatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `template` against `context`.
    ///
    /// Never fails: unknown fields and malformed directives degrade to empty
    /// branches or placeholders, and a value the date formatter rejects is
    /// substituted unformatted.
    pub fn render(&self, template: &str, context: &Context) -> String {
        let resolved = self.resolve_directives(template, context);
        let substituted = substitution::substitute_variables(
            &resolved,
            context,
            &self.options,
            self.formatter.as_ref(),
        );
        self.finish(substituted)
    }

    /// Render `template`, failing on the first value the date formatter rejects.
    pub fn try_render(&self, template: &str, context: &Context) -> Result<String> {
        let resolved = self.resolve_directives(template, context);
        let substituted = substitution::try_substitute_variables(
            &resolved,
            context,
            &self.options,
            self.formatter.as_ref(),
        )?;
        Ok(self.finish(substituted))
    }

    fn resolve_directives(&self, template: &str, context: &Context) -> String {
        debug!(
            "Rendering template ({} bytes) with {} context field(s)",
            template.len(),
            context.len()
        );

        let result = directives::resolve_equality_blocks(template, context);
        debug!("After #eq: {} bytes", result.len());
        let result = directives::resolve_if_else_blocks(&result, context);
        debug!("After #if/#else: {} bytes", result.len());
        let result = directives::resolve_if_blocks(&result, context);
        debug!("After #if: {} bytes", result.len());
        let result = directives::resolve_unless_blocks(&result, context);
        debug!("After #unless: {} bytes", result.len());
        let result = directives::expand_each_blocks(&result, context);
        debug!("After #each: {} bytes", result.len());
        result
    }

    fn finish(&self, substituted: String) -> String {
        debug!("After substitution: {} bytes", substituted.len());
        if self.options.clean_unused_placeholders {
            let cleaned = cleanup::remove_unresolved_tokens(&substituted);
            debug!("After cleanup: {} bytes", cleaned.len());
            cleaned
        } else {
            substituted
        }
    }
}

/// Render with the default date formatter.
pub fn render(template: &str, context: &Context, options: &RenderOptions) -> String {
    Renderer::new(options.clone()).render(template, context)
}

/// Render with the default date formatter, propagating date formatting failures.
pub fn try_render(template: &str, context: &Context, options: &RenderOptions) -> Result<String> {
    Renderer::new(options.clone()).try_render(template, context)
}

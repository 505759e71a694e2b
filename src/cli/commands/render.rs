//! `minuta render`

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::read_template;
use crate::config::load_config;
use crate::template::{Context, RenderOptions, Renderer};

/// Parameters for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderParams {
    pub template: PathBuf,
    pub contexts: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_cleanup: bool,
    pub no_format_dates: bool,
    pub placeholder: Option<String>,
    pub strict: bool,
    pub output: Option<PathBuf>,
}

impl RenderParams {
    /// Command-line flags win over file and environment configuration
    fn apply_to(&self, options: &mut RenderOptions) {
        if self.no_cleanup {
            options.clean_unused_placeholders = false;
        }
        if self.no_format_dates {
            options.format_dates = false;
        }
        if let Some(placeholder) = &self.placeholder {
            options.missing_field_placeholder = placeholder.clone();
        }
    }
}

pub fn run_render(params: RenderParams) -> Result<()> {
    let mut config =
        load_config(params.config.as_deref()).context("Failed to load configuration")?;
    params.apply_to(&mut config.render);
    debug!("Render options: {:?}", config.render);

    let template = read_template(&params.template)?;
    let context = load_context(&params.contexts)?;
    let renderer = Renderer::new(config.render);

    let document = if params.strict {
        renderer.try_render(&template, &context)?
    } else {
        renderer.render(&template, &context)
    };

    match &params.output {
        Some(path) => fs::write(path, &document)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", document),
    }

    Ok(())
}

/// Merge JSON object records into one context, in order.
pub fn load_context(paths: &[PathBuf]) -> Result<Context> {
    let mut context = Context::new();
    for path in paths {
        let record = read_json(path)?;
        context
            .merge_json(&record)
            .with_context(|| format!("Invalid context file {}", path.display()))?;
    }
    debug!("Loaded {} context field(s)", context.len());
    Ok(context)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read context {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Context {} is not valid JSON", path.display()))
}

//! Command implementation modules
//!
//! Each command is implemented as a separate module.

pub mod inspect;
pub mod render;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

// Re-export command execution functions
pub use inspect::{run_sample, run_validate, run_variables};
pub use render::{run_render, RenderParams};

/// Read a template file, or stdin when the path is `-`
pub(crate) fn read_template(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read template from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))
}

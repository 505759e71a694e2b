//! `minuta validate`, `minuta variables` and `minuta sample`

use anyhow::{bail, Result};
use std::path::Path;

use super::read_template;
use crate::template::{
    extract_variables, render, sample_context, validate_template, RenderOptions,
};

/// Print a validation report; fails when the template is invalid.
pub fn run_validate(template_path: &Path, json: bool) -> Result<()> {
    let template = read_template(template_path)?;
    let report = validate_template(&template);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_valid {
        println!("{}: ok", template_path.display());
    } else {
        for error in &report.errors {
            println!("{}: {}", template_path.display(), error);
        }
    }

    if !report.is_valid {
        bail!(
            "{} has {} problem(s)",
            template_path.display(),
            report.errors.len()
        );
    }
    Ok(())
}

pub fn run_variables(template_path: &Path, json: bool) -> Result<()> {
    let template = read_template(template_path)?;
    let variables = extract_variables(&template);

    if json {
        println!("{}", serde_json::to_string_pretty(&variables)?);
    } else {
        for variable in variables {
            println!("{}", variable);
        }
    }
    Ok(())
}

pub fn run_sample(template_path: &Path, render_preview: bool) -> Result<()> {
    let template = read_template(template_path)?;
    let context = sample_context(&template);

    if render_preview {
        print!("{}", render(&template, &context, &RenderOptions::default()));
    } else {
        println!("{}", serde_json::to_string_pretty(&context)?);
    }
    Ok(())
}

//! # minuta
//!
//! Renders legal and contractual documents from a flat, handlebars-style
//! template language evaluated against a context of form and contract fields.
//!
//! ## Usage
//!
//! ```bash
//! minuta render termo.txt --context contrato.json --context formulario.json
//! ```
//!
//! ## Modules
//!
//! - `template` - The rendering pipeline, context model and template analysis
//! - `date` - Date localization used for date-like fields
//! - `config` - Render options from `minuta.toml` and the environment
//! - `error` - Crate error type
//! - `app` - Logging and process-level error handling for the binary
//! - `cli` - Command-line interface
pub mod app;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod template;

pub use error::{MinutaError, Result};
pub use template::{render, try_render, Context, RenderOptions, Renderer, Value};

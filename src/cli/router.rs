//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::args::{Cli, Commands};
use crate::cli::commands::*;

/// Execute a CLI command based on the parsed arguments
pub fn execute_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Render {
            template,
            contexts,
            config,
            no_cleanup,
            no_format_dates,
            placeholder,
            strict,
            output,
        }) => run_render(RenderParams {
            template,
            contexts,
            config,
            no_cleanup,
            no_format_dates,
            placeholder,
            strict,
            output,
        }),
        Some(Commands::Validate { template, json }) => run_validate(&template, json),
        Some(Commands::Variables { template, json }) => run_variables(&template, json),
        Some(Commands::Sample { template, render }) => run_sample(&template, render),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

use crate::error::MinutaError;

pub const EXIT_GENERAL_ERROR: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_DATE_FORMAT_ERROR: i32 = 3;

/// Exit code for an error returned by a command
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<MinutaError>() {
        Some(MinutaError::Config(_)) | Some(MinutaError::Toml(_)) => EXIT_CONFIG_ERROR,
        Some(MinutaError::DateFormat { .. }) => EXIT_DATE_FORMAT_ERROR,
        _ => EXIT_GENERAL_ERROR,
    }
}

/// Report a fatal error and exit
///
/// # Verbose Mode Behavior
/// - `verbose = 0`: Top-level message only
/// - `verbose >= 1`: Includes the full error chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}

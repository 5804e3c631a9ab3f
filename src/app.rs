//! Application logic for the SQL User Provisioner CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

mod commands;
mod helpers;
mod types;

pub use commands::{
    process_request, run_alter, run_batch, run_create, run_drop, run_reconcile, run_search
};
pub use helpers::{
    convert_format, convert_grant_kind, create_output_options, decode_request, load_request,
    read_input, resolve_setup
};
use tracing::debug;
pub use types::{CommandOutcome, ProvisionRequest};

use crate::{
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};

/// Dispatches a parsed command line.
///
/// The case-sensitivity setup is built once per process and shared by every
/// builder the command uses.
///
/// # Errors
///
/// Returns the first input, decoding or validation error.
pub fn run(cli: &Cli, config: &Config) -> AppResult<CommandOutcome> {
    let setup = resolve_setup(cli.case_sensitivity.as_deref(), config)?;
    let opts = create_output_options(cli.output_format, cli.no_color, cli.verbose);
    debug!(
        notation = cli.case_sensitivity.is_some() || config.case_sensitivity.is_some(),
        "case-sensitivity setup resolved"
    );

    match &cli.command {
        Commands::Create {
            input
        } => run_create(&input.display().to_string(), &setup, &opts),
        Commands::Alter {
            input,
            existing
        } => run_alter(
            &input.display().to_string(),
            &existing.display().to_string(),
            &setup,
            &opts
        ),
        Commands::Drop {
            user,
            cascade
        } => run_drop(user, *cascade || config.drop_cascade, &setup, &opts),
        Commands::Reconcile {
            user,
            category,
            current,
            desired
        } => run_reconcile(
            user,
            convert_grant_kind(*category),
            current,
            desired,
            &setup,
            &opts
        ),
        Commands::Search {
            query,
            attributes
        } => {
            let query = query.as_ref().map(|p| p.display().to_string());
            run_search(query.as_deref(), attributes, &setup, &opts)
        }
        Commands::Batch {
            input
        } => run_batch(&input.display().to_string(), &setup, &opts)
    }
}

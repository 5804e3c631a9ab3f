use std::process;

use clap::Parser;
use sql_user_provisioner::{app, cli::Cli, config::Config, error::AppResult, logging};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(&config.logging, cli.verbose);
    tracing::debug!(command = ?cli.command, "dispatching");

    let outcome = app::run(&cli, &config)?;
    print!("{}", outcome.output);
    Ok(outcome.exit_code)
}

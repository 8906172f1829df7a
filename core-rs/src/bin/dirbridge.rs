//! dirbridge - import broker bindings into a naming directory
//!
//! Exit status is 0 on success and after printing usage for a parameter
//! problem, 1 when the directory operation fails.

use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use dirbridge_core::cli::{illegal_argument, normalize_args, BridgeArgs, BRIDGE_USAGE};
use dirbridge_core::drivers::StandardDriverFactory;
use dirbridge_core::{bridge, BridgeError, Outcome};

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &BridgeArgs) -> anyhow::Result<Outcome> {
    let params = cli.parameters()?;
    let outcome = bridge::execute(&params, &StandardDriverFactory)
        .with_context(|| format!("{} failed", params.operation.as_deref().unwrap_or("Operation")))?;
    Ok(outcome)
}

fn main() {
    let cli = match BridgeArgs::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", BRIDGE_USAGE);
            println!("Illegal argument specified - {}", illegal_argument(&e));
            return;
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(outcome) => println!("{}", outcome),
        Err(err) => match err.downcast_ref::<BridgeError>() {
            Some(BridgeError::Validation(msg)) => {
                println!("{}", BRIDGE_USAGE);
                println!("{}", msg);
            }
            Some(e) if !e.is_fatal() => println!("{}", e),
            _ => {
                eprintln!("Error: {:?}", err);
                std::process::exit(1);
            }
        },
    }
}

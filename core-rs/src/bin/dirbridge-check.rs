//! dirbridge-check - verify that a connection factory and a destination
//! are bound in a naming directory

use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use dirbridge_core::cli::{illegal_argument, normalize_args, CheckArgs, CHECK_USAGE};
use dirbridge_core::drivers::StandardDriverFactory;
use dirbridge_core::{verify, BridgeError, VerifiedBindings};

fn run(cli: &CheckArgs) -> anyhow::Result<VerifiedBindings> {
    let config = cli.parameters()?.validate()?;
    let verified = verify::run(&config, &StandardDriverFactory)
        .with_context(|| format!("Binding check on {} failed", config.endpoint.provider_url()))?;
    Ok(verified)
}

fn main() {
    let cli = match CheckArgs::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", CHECK_USAGE);
            println!("Illegal argument specified - {}", illegal_argument(&e));
            return;
        }
    };

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(verified) => {
            println!("{}", verified);
            println!("Bindings OK");
        }
        Err(err) => match err.downcast_ref::<BridgeError>() {
            Some(BridgeError::Validation(msg)) => {
                println!("{}", CHECK_USAGE);
                println!("{}", msg);
            }
            _ => {
                eprintln!("Error: {:?}", err);
                std::process::exit(1);
            }
        },
    }
}

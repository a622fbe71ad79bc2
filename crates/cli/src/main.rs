mod cli;
mod run;

use std::process::ExitCode;

use clap::Parser;
use fieldguard_core::config::{load_dotenv, Config};

use crate::cli::CliArgs;
use crate::run::{run, Outcome};

fn main() -> ExitCode {
    load_dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let mut stdout = std::io::stdout().lock();

    match run(&args, config, &mut stdout) {
        Ok(Outcome::Valid) => ExitCode::SUCCESS,
        Ok(Outcome::Invalid) => ExitCode::from(1),
        Err(e) => {
            eprintln!("fieldguard: {e:#}");
            ExitCode::from(2)
        }
    }
}

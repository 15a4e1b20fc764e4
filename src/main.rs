use anyhow::Result;
use clap::Parser;
use tracing::info;

use std::process::ExitCode;

use sales_summary::{cli::Args, logging, Error};

fn main() -> Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            println!("{}", Error::Argument(e.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init(args.verbose)?;
    match sales_summary::run(&args.directory, &args.config()) {
        Ok(summary) => {
            info!(files = summary.files_processed, "done");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

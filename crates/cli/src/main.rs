use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use sift_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about = "File selection and retention toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::List(args) => commands::list::run(args),
        Command::Prune(args) => commands::prune::run(args),
        Command::Transcript(args) => commands::transcript::run(args),
    }
}

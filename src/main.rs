mod cli;
mod config;
mod convert;
mod list;
mod logging;
mod summarize;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::List(args) => list::run(args),
        Command::Summarize(args) => summarize::run(args),
    }
}

use anyhow::Result;
use clap::Parser;

mod cli;
mod convert_cmd;
mod logging;
mod path_guard;
mod run_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match cli.command {
        Command::Run(args) => run_cmd::run(args),
        Command::Convert(args) => convert_cmd::run_convert(args),
    }
}

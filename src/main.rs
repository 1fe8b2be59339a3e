extern crate vcfsieve_lib;
pub mod commands;
use anyhow::Result;
use commands::sieve::Sieve;
use env_logger::Env;
use log::*;
use structopt::{clap::ErrorKind, StructOpt};
use vcfsieve_lib::utils;

/// Exit status for bad or missing command line arguments.
const USAGE_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = match Sieve::from_iter_safe(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => match err.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                std::process::exit(USAGE_EXIT_CODE);
            }
        },
    };
    if let Err(err) = args.run() {
        if utils::is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}

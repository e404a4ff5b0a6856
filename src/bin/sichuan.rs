use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as CParser;
use log::error;

/// A single source argument, since this interpreter has no separate
/// compile/run modes.
#[derive(CParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Reads from stdin when omitted.
    file: Option<PathBuf>,

    /// Print debug/trace-level pipeline logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Trace
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).unwrap();

    let source = match &args.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|err| {
            error!("could not read '{}': {err}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).unwrap_or_else(|err| {
                error!("could not read stdin: {err}");
                std::process::exit(1);
            });
            buf
        }
    };

    match sichuan::run(&source) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            print!("{}", err.partial_output());
            error!("{err}");
            std::process::exit(1);
        }
    }
}

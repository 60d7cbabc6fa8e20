//! # skyscraper
//!
//! Command-line solver for skyscraper puzzles. A puzzle is encoded as
//! finite-domain constraints, lowered to CNF and decided by the crate's CDCL
//! engine. The decoded grid is printed together with the elapsed time.
//!
//! ## Usage
//!
//! ```sh
//! # Solve the built-in 7x7 puzzle with the boolean visibility encoding
//! skyscraper
//!
//! # Solve the built-in 9x9 puzzle with the arithmetic encoding and statistics
//! skyscraper 9 --encoding arithmetic --stats
//!
//! # Solve a puzzle file and print the generated SMT-LIB script first
//! skyscraper file puzzle.sky --print-constraints
//!
//! # Solve every .sky file below a directory
//! skyscraper dir puzzles/
//!
//! # Export the CNF of the built-in 5x5 puzzle
//! skyscraper 5 --export-dimacs five.cnf
//! ```
//!
//! Logging goes through `env_logger`; `RUST_LOG` overrides the level chosen by
//! `--debug`.

use clap::{CommandFactory, Parser};
use command_line::cli::{solve_builtin, solve_dir, solve_file, Cli, Commands, CommonOptions};
use skyscraper_sat::skyscraper::catalog;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics table.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logging(common: &CommonOptions) {
    let level = if common.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::File { path, common }) => {
            init_logging(&common);
            solve_file(&path, &common)
        }
        Some(Commands::Dir { path, common }) => {
            init_logging(&common);
            solve_dir(&path, &common)
        }
        Some(Commands::List) => {
            for size in catalog::available_sizes() {
                println!("{size}x{size}");
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            init_logging(&cli.common);
            solve_builtin(cli.size, &cli.common)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

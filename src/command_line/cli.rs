#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use skyscraper_sat::skyscraper::catalog;
use skyscraper_sat::skyscraper::parser::parse_puzzle_file;
use skyscraper_sat::skyscraper::{build, decode, Constraints, Encoding, Grid, Puzzle, Verdict};
use skyscraper_sat::smt::backend::{BackendConfig, FiniteDomainSolver};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface of the skyscraper solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "skyscraper",
    version,
    about = "Solves skyscraper puzzles through a SAT encoding",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// Size of the built-in puzzle to solve when no subcommand is given.
    #[arg(default_value_t = 7)]
    pub size: usize,

    /// Specifies the subcommand to execute (e.g. `file`, `dir`).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options for solving the built-in puzzle.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file.
    File {
        /// Path to the puzzle file. The format is described in `skyscraper::parser`.
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.sky` puzzle file below a directory.
    Dir {
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// List the sizes of the built-in puzzles.
    List,

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// How edge clues are encoded.
    #[arg(short, long, value_enum, default_value_t = Encoding::Boolean)]
    pub(crate) encoding: Encoding,

    /// Print the generated constraints as an SMT-LIB script before solving.
    #[arg(short = 'c', long, default_value_t = false)]
    pub(crate) print_constraints: bool,

    /// Write the generated CNF to this path in DIMACS format.
    #[arg(long)]
    pub(crate) export_dimacs: Option<PathBuf>,

    /// Give up after this many conflicts and report the puzzle as undetermined.
    #[arg(long)]
    pub(crate) max_conflicts: Option<u64>,

    /// Seed for the randomised decisions of the SAT search.
    #[arg(long, default_value_t = BackendConfig::default().seed)]
    pub(crate) seed: u64,

    /// Skip checking the decoded grid against the puzzle.
    #[arg(long, default_value_t = false)]
    pub(crate) no_verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,
}

impl CommonOptions {
    fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            max_conflicts: self.max_conflicts,
            seed: self.seed,
        }
    }
}

/// Solves the built-in puzzle of the given size.
///
/// # Errors
///
/// If there is no built-in puzzle of that size.
pub(crate) fn solve_builtin(size: usize, common: &CommonOptions) -> Result<(), String> {
    let puzzle = catalog::instance(size).map_err(|e| e.to_string())?;
    solve_and_report(&puzzle, &format!("built-in {size}x{size}"), Duration::ZERO, common)
}

/// Parses and solves a puzzle file.
///
/// # Errors
///
/// If the file is missing or malformed.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Puzzle file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    let time = Instant::now();
    let puzzle = parse_puzzle_file(path)
        .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&puzzle, &path.display().to_string(), parse_time, common)
}

/// Solves every `.sky` file below `path`.
///
/// # Errors
///
/// If `path` is not a directory, or on the first file that fails.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "sky") {
            eprintln!("Skipping non-puzzle file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
        println!();
    }

    Ok(())
}

/// Builds, solves and decodes `puzzle`, printing the grid or the failure,
/// optional statistics and the elapsed time.
///
/// # Errors
///
/// If the DIMACS export cannot be written or the grid fails verification.
/// An unsolvable or undecided puzzle is reported, not an error.
pub(crate) fn solve_and_report(
    puzzle: &Puzzle,
    label: &str,
    parse_time: Duration,
    common: &CommonOptions,
) -> Result<(), String> {
    println!("Solving: {label}");

    let time = Instant::now();
    let constraints = build(puzzle, common.encoding);

    if common.print_constraints {
        println!("solver: {constraints}");
    }

    let mut solver = FiniteDomainSolver::with_config(common.backend_config());
    constraints.post(&mut solver);

    if let Some(dimacs_path) = &common.export_dimacs {
        std::fs::write(dimacs_path, solver.cnf().to_string())
            .map_err(|e| format!("Unable to write {}: {e}", dimacs_path.display()))?;
        println!("DIMACS written to: {}", dimacs_path.display());
    }

    let verdict = Verdict::from_solver(&mut solver);
    let result = decode(constraints.grid(), verdict);
    let elapsed = time.elapsed();

    match &result {
        Ok(grid) => print!("{grid}"),
        Err(e) => println!("no solution found: {e}"),
    }

    if common.stats {
        print_stats(parse_time, elapsed, &constraints, &solver, memory_usage());
    }

    println!("Time: {:.6}s", elapsed.as_secs_f64());

    match result {
        Ok(grid) if !common.no_verify => verify_grid(&grid, puzzle),
        _ => Ok(()),
    }
}

/// Checks a decoded grid against every constraint of the puzzle.
///
/// # Errors
///
/// Describes the first violated constraint.
pub(crate) fn verify_grid(grid: &Grid, puzzle: &Puzzle) -> Result<(), String> {
    grid.check(puzzle)
        .map_err(|violation| format!("Solution failed verification: {violation}"))?;
    println!("Verified: true");
    Ok(())
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> Option<(f64, f64)> {
    const MIB: f64 = 1024.0 * 1024.0;

    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((allocated as f64 / MIB, resident as f64 / MIB))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: u64, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
///
/// # Arguments
/// * `parse_time` - Duration spent parsing the input.
/// * `elapsed` - Duration spent building, solving and decoding.
/// * `constraints` - The constraints that were posted.
/// * `solver` - The backend after the check, for CNF size and search counters.
/// * `memory` - Allocated and resident memory in MiB, if jemalloc reported them.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    constraints: &Constraints,
    solver: &FiniteDomainSolver,
    memory: Option<(f64, f64)>,
) {
    let elapsed_secs = elapsed.as_secs_f64();
    let cnf = solver.cnf();
    let s = solver.stats();
    let n = constraints.grid().size();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Grid", format!("{n}x{n}"));
    stat_line("Encoding", constraints.encoding());
    stat_line("Assertions", constraints.assertions().len());
    stat_line("Boolean variables", cnf.num_vars);
    stat_line("Clauses", cnf.len());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line("Learnt clauses", s.learnt_clauses);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Restarts", s.restarts, elapsed_secs);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

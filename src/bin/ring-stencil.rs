//! # ring-stencil
//!
//! Runs one pipelined stencil pass over a random `ROWS x COLUMNS` grid and
//! checks it against the sequential reference.
//!
//! Without the `mpi-support` feature the ranks are threads of this process
//! (`--ranks N`). With it, launch under MPI:
//! `mpirun -np <P> ring-stencil <ROWS> <COLUMNS>`.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use ring_stencil::COORDINATOR;
use ring_stencil::algs::pipeline::RunReport;
use ring_stencil::config::{DEFAULT_SEED, RunConfig};
use ring_stencil::stencil_error::StencilError;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Pipelined ring stencil pass with sequential validation")]
struct Cli {
    /// Number of grid rows (at most 1000, divisible by the rank count)
    rows: usize,

    /// Number of grid columns (at most 1000)
    columns: usize,

    /// Number of in-process ranks (ignored under MPI)
    #[arg(short, long, default_value_t = 1)]
    ranks: usize,

    /// Seed for the random grid
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Enable debug log messages
    #[arg(short, long)]
    debug: bool,

    /// Do not print the grids
    #[arg(short, long)]
    quiet: bool,
}

/// Configure the logger level and format.
fn setup_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

#[cfg(feature = "mpi-support")]
fn launch(_cli: &Cli, config: &RunConfig) -> (usize, Result<Option<RunReport>, StencilError>) {
    use ring_stencil::algs::communicator::{Communicator, MpiComm};
    use ring_stencil::runner::run_rank;

    let comm = match MpiComm::new() {
        Ok(comm) => comm,
        Err(e) => return (COORDINATOR, Err(e)),
    };
    let rank = comm.rank();
    (rank, run_rank(&comm, config))
}

#[cfg(not(feature = "mpi-support"))]
fn launch(cli: &Cli, config: &RunConfig) -> (usize, Result<Option<RunReport>, StencilError>) {
    use ring_stencil::runner::run_local;

    (COORDINATOR, run_local(config, cli.ranks).map(Some))
}

fn print_report(report: &RunReport, quiet: bool) {
    if !quiet {
        println!("Generated grid:\n{}", report.initial);
    }
    println!("Rows per process: {}", report.rows_per_rank);
    if !quiet {
        println!("Final grid:\n{}", report.result);
    }
    match &report.mismatch {
        None => println!("Result validated successfully."),
        Some(m) => println!(
            "ERROR: grids differ at [{}][{}] reference={}, final={}",
            m.row, m.col, m.expected, m.actual
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logger(cli.debug);

    let config = RunConfig::new(cli.rows, cli.columns).with_seed(cli.seed);
    let (rank, outcome) = launch(&cli, &config);

    match outcome {
        Ok(Some(report)) => {
            print_report(&report, cli.quiet);
            if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            if rank == COORDINATOR {
                eprintln!("error: {e}");
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1).max(1))
        }
    }
}

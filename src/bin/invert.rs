use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use exact_rref::{
    narrator::{parse_delay, Narrator, NarratorSettings},
    parser::read_matrix,
    tensors::matrix::MatrixError,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Invert a square matrix using exact fractions by row reducing `[A | I]`.
#[derive(Debug, Parser)]
#[command(name = "invert", about, long_about = None)]
struct Cli {
    /// File with one matrix row per line. Standard input is read if absent.
    file: Option<PathBuf>,

    /// Show every row operation of the reduction
    #[arg(long, short)]
    interactive: bool,

    /// Seconds to pause after every row operation in interactive mode
    #[arg(long, default_value = "1", value_parser = parse_delay)]
    delay: Duration,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("EXACT_RREF_LOG"))
        .init();

    let cli = Cli::parse();

    let matrix = match read_matrix(cli.file.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut augmented = match matrix.augment_identity() {
        Ok(m) => m,
        Err(_) => {
            println!("Matrix not invertible -- invalid dimension");
            return ExitCode::SUCCESS;
        }
    };
    println!("{}", augmented);

    println!("Row reduce...");
    let result = if cli.interactive {
        let mut narrator = Narrator::new(io::stdout(), NarratorSettings { delay: cli.delay });
        augmented.row_reduce_with(&mut narrator)
    } else {
        augmented.row_reduce()
    };

    if let Err(e) = result {
        if e.is_dimension_error() {
            println!("Matrix not invertible -- invalid dimension");
            return ExitCode::SUCCESS;
        }
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("{}", augmented);

    match augmented.extract_inverse() {
        Ok(inv) => {
            println!("Result: ");
            println!("{}", inv);
        }
        Err(MatrixError::Singular) => println!("Matrix not invertible"),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

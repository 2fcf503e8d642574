use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use exact_rref::{
    narrator::{parse_delay, Narrator, NarratorSettings},
    parser::read_matrix,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Row reduce a matrix to reduced row-echelon form using exact fractions,
/// showing every row operation.
#[derive(Debug, Parser)]
#[command(name = "rref", about, long_about = None)]
struct Cli {
    /// File with one matrix row per line. Standard input is read if absent.
    file: Option<PathBuf>,

    /// Seconds to pause after every row operation
    #[arg(long, default_value = "1", value_parser = parse_delay)]
    delay: Duration,

    /// Only print the input and the reduced matrix
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("EXACT_RREF_LOG"))
        .init();

    let cli = Cli::parse();

    if cli.file.is_none() {
        println!("Enter matrix:");
    }

    let mut matrix = match read_matrix(cli.file.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.quiet {
        println!("{}", matrix);
        matrix.row_reduce()
    } else {
        let mut narrator = Narrator::new(io::stdout(), NarratorSettings { delay: cli.delay });
        matrix.row_reduce_with(&mut narrator)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("->");
    println!();
    println!("{}", matrix);

    ExitCode::SUCCESS
}

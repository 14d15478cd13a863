// Generates stealth circuit test suites, one per test directory argument.
// Usage:
//   RUST_LOG=debug cargo run --release --bin stealth-gen -- tests/fam1_small tests/fam3_xor
// Every directory must contain a config.txt; artifacts are written next to it.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use stealth_circuits::{generate_suite, logging::init_tracing_with};
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about, name = "stealth-gen", long_about = None)]
struct Cli {
    /// Root written in front of every test.txt entry.
    #[arg(long, default_value = "stealth")]
    prefix: String,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
    /// Test directories, each holding a config.txt.
    #[arg(required = true)]
    test_dirs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing_with(&cli.log);

    for test_dir in &cli.test_dirs {
        match generate_suite(test_dir, &cli.prefix) {
            Ok(summary) => info!(
                "{}: done ({} circuits, {} inputs)",
                test_dir.display(),
                summary.circuits,
                summary.inputs
            ),
            Err(err) => {
                error!("{}: {err}", test_dir.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

use std::{path::PathBuf, process::exit};

use clap::Parser;
use log::trace;
use sdfix::{config::Config, convert_file, verify::GrammarCheck};

#[derive(Parser)]
struct Cli {
    /// The path to the SDF-like file to repair.
    #[arg(short, long)]
    input_path: PathBuf,

    /// The directory receiving the corrected SDF file, written under the
    /// same base name as the input.
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Where to write the blocks that could not be repaired. When omitted,
    /// failed blocks are counted and dropped.
    #[arg(short, long)]
    failure_record_path: Option<PathBuf>,

    /// The path to a TOML config file setting the atom-count ceiling and
    /// the required data-item tags.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the atom-count ceiling from the config.
    #[arg(short, long)]
    max_atoms: Option<usize>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to load config {path:?}: {e}");
                exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(max_atoms) = cli.max_atoms {
        cfg.max_atoms = max_atoms;
    }
    trace!("initializing parser with ceiling {}", cfg.max_atoms);
    let parser = GrammarCheck::new(cfg.max_atoms);

    match convert_file(
        &cli.input_path,
        &cli.output_dir,
        cli.failure_record_path.as_deref(),
        &cfg,
        &parser,
    ) {
        // per-block failures are already in the summary; only I/O-level
        // trouble is fatal
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    }
}

//! classify the blocks of an SDF file and print a status summary, without
//! writing anything

use std::{
    fs::File,
    io::BufReader,
    process::exit,
    sync::atomic::{AtomicUsize, Ordering},
};

use clap::Parser;
use rayon::iter::{ParallelBridge, ParallelIterator};
use sdfix::{
    classify::{classify, RepairStatus},
    config::MAX_ATOMS,
    split::Blocks,
};

#[derive(Parser)]
struct Cli {
    /// The path to the SDF file to scan.
    #[arg(short, long)]
    input_path: String,

    /// The atom-count ceiling used by the classifier.
    #[arg(short, long, default_value_t = MAX_ATOMS)]
    max_atoms: usize,

    /// The number of threads to use. Defaults to the number of logical CPUs
    /// as detected by rayon.
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let file = match File::open(&cli.input_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to open {}: {e}", cli.input_path);
            exit(1);
        }
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .unwrap();

    let progress = AtomicUsize::new(0);
    let well_formed = AtomicUsize::new(0);
    let missing_counts = AtomicUsize::new(0);
    let missing_end = AtomicUsize::new(0);
    let missing_both = AtomicUsize::new(0);
    let unrepairable = AtomicUsize::new(0);
    let read_errors = AtomicUsize::new(0);

    Blocks::new(BufReader::new(file)).par_bridge().for_each(|block| {
        let cur = progress.fetch_add(1, Ordering::Relaxed);
        if cur > 0 && cur % 100_000 == 0 {
            eprintln!("{cur} blocks scanned");
        }
        let Ok(block) = block else {
            read_errors.fetch_add(1, Ordering::Relaxed);
            return;
        };
        let counter = match classify(&block, cli.max_atoms) {
            Ok(c) => match c.status {
                RepairStatus::WellFormed => &well_formed,
                RepairStatus::MissingCountsLine => &missing_counts,
                RepairStatus::MissingEndMarker => &missing_end,
                RepairStatus::MissingBoth => &missing_both,
            },
            Err(_) => &unrepairable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    });

    println!("Summary:");
    println!("total              {}", progress.into_inner());
    println!("well-formed        {}", well_formed.into_inner());
    println!("missing counts     {}", missing_counts.into_inner());
    println!("missing end marker {}", missing_end.into_inner());
    println!("missing both       {}", missing_both.into_inner());
    println!("unrepairable       {}", unrepairable.into_inner());
    let read_errors = read_errors.into_inner();
    if read_errors > 0 {
        println!("read errors        {read_errors}");
    }
}

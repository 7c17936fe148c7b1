use clap::Parser;
use seqtensor_prep::{run_preparation, Args};
use tracing::Level;

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_preparation(&args) {
        eprintln!("Preparation failed: {:#}", e);
        std::process::exit(1);
    }
}

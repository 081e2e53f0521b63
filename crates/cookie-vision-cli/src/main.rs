//! cookie-vision - labeled screen-capture dataset collector
//!
//! Usage:
//!   cookie-vision init        Create empty dataset files
//!   cookie-vision collect     Run the labeling capture loop
//!   cookie-vision status      Report dataset counts
//!   cookie-vision --help      Show help

use std::fs::File;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod input;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    init_logging();

    match cli::parse_args(&args) {
        Ok((command, options)) => cli::run(command, options),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    // The collect loop holds the terminal in raw mode, so log to a file to
    // avoid corrupting the operator-facing output
    if let Ok(log_file) = File::create("cookie-vision.log") {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_target(false)
            .with_ansi(false)
            .with_writer(log_file.with_max_level(Level::INFO))
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
    // If file creation fails, logging is simply disabled (no subscriber set)
}

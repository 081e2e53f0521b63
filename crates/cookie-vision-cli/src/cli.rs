//! Command parsing and dispatch
//!
//! Usage:
//!   cookie-vision init                     Create empty dataset files
//!   cookie-vision collect                  Run the labeling capture loop
//!   cookie-vision status                   Report dataset counts
//!   cookie-vision snapshot <path>          Save one canonical frame as PNG
//!
//! Options:
//!   --data-dir <dir>   Dataset directory (default from config)
//!   --pool-size <n>    Block-mean pool size (default from config)
//!   --json             Output status in JSON format

use std::io::Write;
use std::path::PathBuf;

use cookie_vision_core::capture::{FrameCapturer, GdiGrabber};
use cookie_vision_core::{CaptureProgress, CaptureSession, Config, DatasetStore, Label};

use crate::input::KeyboardSource;

/// CLI command to execute
#[derive(Debug, Clone)]
pub enum CliCommand {
    Init,
    Collect,
    Status,
    Snapshot { output: PathBuf },
}

/// CLI options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub json: bool,
    pub data_dir: Option<PathBuf>,
    pub pool_size: Option<u32>,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command: Option<CliCommand> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--data-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--data-dir requires a value".to_string());
                }
                options.data_dir = Some(PathBuf::from(&args[i]));
            }
            "--pool-size" => {
                i += 1;
                if i >= args.len() {
                    return Err("--pool-size requires a value".to_string());
                }
                let n = args[i]
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid pool size: {}", args[i]))?;
                if n == 0 {
                    return Err("Pool size must be at least 1".to_string());
                }
                options.pool_size = Some(n);
            }
            "init" => command = Some(CliCommand::Init),
            "collect" => command = Some(CliCommand::Collect),
            "status" => command = Some(CliCommand::Status),
            "snapshot" => {
                i += 1;
                if i >= args.len() {
                    return Err("snapshot requires an output path".to_string());
                }
                command = Some(CliCommand::Snapshot {
                    output: PathBuf::from(&args[i]),
                });
            }
            _ => {
                if command.is_none() {
                    return Err(format!("Unknown command: {}", arg));
                }
                // Nothing takes trailing positionals, so a stray token here
                // is a typo (e.g. a misspelled --option)
                return Err(format!("Unexpected argument: {}", arg));
            }
        }
        i += 1;
    }

    let command = command
        .ok_or_else(|| "No command specified. Use: init, collect, status, or snapshot".to_string())?;

    Ok((command, options))
}

/// Effective config: stored config overridden by command-line options
fn effective_config(options: &CliOptions) -> Config {
    let mut config = Config::load();
    if let Some(ref data_dir) = options.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(pool_size) = options.pool_size {
        config.pool_size = pool_size;
    }
    config
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions) -> anyhow::Result<()> {
    let config = effective_config(&options);
    config.validate()?;
    match command {
        CliCommand::Init => run_init(&config),
        CliCommand::Collect => run_collect(&config),
        CliCommand::Status => run_status(&config, options.json),
        CliCommand::Snapshot { output } => run_snapshot(&config, &output),
    }
}

fn run_init(config: &Config) -> anyhow::Result<()> {
    let store = DatasetStore::new(&config.data_dir);
    store.initialize()?;
    println!("Dataset ready in {}", config.data_dir.display());
    println!("  features: {}", store.features_path().display());
    println!("  labels:   {}", store.labels_path().display());
    Ok(())
}

fn run_collect(config: &Config) -> anyhow::Result<()> {
    let store = DatasetStore::new(&config.data_dir);
    store.initialize()?;

    let capturer = FrameCapturer::with_canonical(
        GdiGrabber::new(),
        config.canonical_width,
        config.canonical_height,
    );

    say(&format!(
        "Collecting into {} (pool size {}, {} values per frame)",
        config.data_dir.display(),
        config.pool_size,
        config.feature_len()
    ));
    say("Keys: [e] Empty  [g] Golden Cookie  [f] Effect  [q] quit");

    // Raw mode is active from here until the source is dropped, so progress
    // lines need explicit carriage returns
    let input = KeyboardSource::new()?;
    let mut session = CaptureSession::new(capturer, input, store, config.pool_size)
        .with_cooldown(config.cooldown())
        .with_progress_callback(Box::new(|progress| match progress {
            CaptureProgress::Capturing(label) => {
                say(&format!("Capturing and saving data - {}", label))
            }
            CaptureProgress::Saved { total } => say(&format!("Data saved ({} pairs)", total)),
            CaptureProgress::Ready => say("Ready to capture more data"),
        }));

    let captured = session.run()?;
    drop(session);
    println!("Captured {} labeled frames this session", captured);
    Ok(())
}

fn run_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = DatasetStore::new(&config.data_dir);
    let (feature_shape, label_shape) = store.shapes()?;
    let (feature_rows, label_rows) = store.counts()?;
    let consistent = feature_rows == label_rows;

    if json {
        let report = serde_json::json!({
            "data_dir": config.data_dir,
            "features": { "rows": feature_rows, "shape": feature_shape },
            "labels": { "rows": label_rows, "shape": label_shape },
            "consistent": consistent,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Dataset in {}", config.data_dir.display());
        println!("  feature rows: {} (shape {:?})", feature_rows, feature_shape);
        println!("  label rows:   {} (shape {:?})", label_rows, label_shape);
        if consistent {
            let counts = label_counts(&store)?;
            for (label, count) in counts {
                println!("  {:>6} x {}", count, label);
            }
            println!("Consistent: yes");
        } else {
            println!("Consistent: NO - the pair is out of sync; repair before training");
        }
    }

    if !consistent {
        std::process::exit(1);
    }
    Ok(())
}

/// Per-label row counts, for the human-readable status report
fn label_counts(store: &DatasetStore) -> anyhow::Result<Vec<(Label, usize)>> {
    let dataset = store.load()?;
    Ok(Label::ALL
        .into_iter()
        .map(|label| {
            let count = dataset.labels().iter().filter(|&&l| l == label).count();
            (label, count)
        })
        .collect())
}

fn run_snapshot(config: &Config, output: &std::path::Path) -> anyhow::Result<()> {
    let mut capturer = FrameCapturer::with_canonical(
        GdiGrabber::new(),
        config.canonical_width,
        config.canonical_height,
    );
    let frame = capturer.capture()?;
    frame.save_png(output)?;
    println!(
        "Saved {}x{} snapshot to {}",
        frame.width(),
        frame.height(),
        output.display()
    );
    Ok(())
}

/// Print one progress line, raw-mode safe
fn say(message: &str) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{}\r\n", message);
    let _ = stdout.flush();
}

/// Print CLI help
pub fn print_help() {
    println!("cookie-vision v{}", env!("CARGO_PKG_VERSION"));
    println!("Collect labeled screen captures for game-state training data");
    println!();
    println!("USAGE:");
    println!("    cookie-vision <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    init               Create empty dataset files");
    println!("    collect            Run the labeling capture loop");
    println!("    status             Report dataset counts and consistency");
    println!("    snapshot <path>    Save one canonical frame as PNG");
    println!();
    println!("OPTIONS:");
    println!("    --data-dir <dir>   Dataset directory (default from config)");
    println!("    --pool-size <n>    Block-mean pool size (default from config)");
    println!("    --json             Output status in JSON format");
    println!("    --help             Show this help message");
    println!();
    println!("During collect: [e] Empty, [g] Golden Cookie, [f] Effect, [q] quit.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            parse_args(&args(&["init"])).unwrap().0,
            CliCommand::Init
        ));
        assert!(matches!(
            parse_args(&args(&["collect"])).unwrap().0,
            CliCommand::Collect
        ));
        assert!(matches!(
            parse_args(&args(&["status", "--json"])).unwrap().0,
            CliCommand::Status
        ));
    }

    #[test]
    fn test_parse_snapshot_path() {
        let (command, _) = parse_args(&args(&["snapshot", "shot.png"])).unwrap();
        match command {
            CliCommand::Snapshot { output } => assert_eq!(output, PathBuf::from("shot.png")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_options() {
        let (_, options) =
            parse_args(&args(&["collect", "--data-dir", "d", "--pool-size", "3"])).unwrap();
        assert_eq!(options.data_dir, Some(PathBuf::from("d")));
        assert_eq!(options.pool_size, Some(3));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["collect", "--pool-size", "0"])).is_err());
        assert!(parse_args(&args(&["collect", "--pool-size"])).is_err());
        assert!(parse_args(&args(&["snapshot"])).is_err());
    }

    #[test]
    fn test_rejects_trailing_tokens() {
        // Misspelled options and stray positionals must not be dropped
        assert!(parse_args(&args(&["status", "--jsno"])).is_err());
        assert!(parse_args(&args(&["collect", "extra"])).is_err());
        assert!(parse_args(&args(&["status", "--json"])).is_ok());
    }
}

//! Command-line front end for the annotation session.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use seqattr::{AnnotationSession, AttributeCode, LogLevel, SessionConfig, SessionError};

#[derive(Parser, Debug)]
#[command(name = "seqattr", version, about = "Per-frame attribute annotation of benchmark sequences")]
struct Cli {
    /// JSON session configuration
    #[arg(long, conflicts_with = "data_root")]
    config: Option<PathBuf>,

    /// Data root holding benchmarkDatasets/ and the attribute directory
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Frame-range file overriding the configured one
    #[arg(long)]
    frame_ranges: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sequence identifiers
    List,
    /// Print one page of a sequence
    Show {
        id: String,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Set the attribute code of one frame
    Set { id: String, frame: usize, code: u8 },
    /// Set the attribute code of frames `from..=to`
    Fill {
        id: String,
        from: usize,
        to: usize,
        code: u8,
    },
    /// Print label counts of a sequence
    Stats { id: String },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] seqattr::ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("either --config or --data-root is required")]
    MissingRoot,
}

fn load_config(cli: &Cli) -> Result<SessionConfig, CliError> {
    let mut config = match (&cli.config, &cli.data_root) {
        (Some(path), _) => SessionConfig::load(path)?,
        (None, Some(root)) => SessionConfig::from_data_root(root),
        (None, None) => return Err(CliError::MissingRoot),
    };
    if let Some(ranges) = &cli.frame_ranges {
        config.frame_range_file = Some(ranges.clone());
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    Ok(config)
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}

fn print_page(session: &AnnotationSession) {
    for entry in session.current_page() {
        let bbox = entry
            .bbox
            .map(|b| format!("{},{},{},{}", b.x, b.y, b.width, b.height))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<16} {:<20} {}",
            entry.index,
            entry.frame.file_name(),
            bbox,
            entry.label
        );
    }
    if let Some(window) = session.window() {
        println!("{}", window.progress());
    }
}

fn print_stats(session: &AnnotationSession) {
    let Some(counts) = session.label_counts() else {
        return;
    };
    for code in AttributeCode::all() {
        let swatch = code
            .color()
            .map(|[r, g, b]| format!("#{:02x}{:02x}{:02x}", r, g, b))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<3} {:<16} {:<8} {}",
            code.short_label(),
            code.name(),
            swatch,
            counts[code.as_u8() as usize]
        );
    }
}

fn run(cli: Cli, config: SessionConfig) -> Result<(), CliError> {
    let mut session = AnnotationSession::from_config(&config)?;

    match cli.command {
        Command::List => {
            for id in session.catalog().list().map_err(SessionError::from)? {
                println!("{}", id);
            }
        }
        Command::Show { id, page } => {
            session.select_sequence(&id)?;
            for _ in 1..page {
                if !session.advance_page() {
                    break;
                }
            }
            print_page(&session);
        }
        Command::Set { id, frame, code } => {
            session.select_sequence(&id)?;
            session.set_attribute(frame, code)?;
            session.close()?;
        }
        Command::Fill { id, from, to, code } => {
            session.select_sequence(&id)?;
            session.set_attribute_range(from, to, code)?;
            session.close()?;
        }
        Command::Stats { id } => {
            session.select_sequence(&id)?;
            print_stats(&session);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_level);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

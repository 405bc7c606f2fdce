//! u2tail - unified2 spool reader
//!
//! Dumps, follows and summarises unified2 files written by IDS sensors.

mod config;
mod dump;
mod render;
mod summary;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use config::{ConfigLoader, DecodeErrorPolicy, TailConfig};
use dump::{run_dump, DumpOptions, RecordFilter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use summary::SpoolSummary;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use unified2_core::{ReadOutcome, RecordReader};

#[derive(Parser)]
#[command(name = "u2tail")]
#[command(version)]
#[command(about = "Read and follow unified2 IDS spool files", long_about = None)]
struct Cli {
    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "U2TAIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print records as JSON lines
    Dump {
        /// Input unified2 file
        #[arg(short, long)]
        input: PathBuf,

        /// Only print records of this kind
        #[arg(short = 't', long, value_enum)]
        record_type: Option<RecordFilter>,

        /// Number of records to print
        #[arg(short, long)]
        num: Option<usize>,

        /// Follow mode (tail -f style)
        #[arg(short, long)]
        follow: bool,

        /// Byte offset of the first record to read
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Pretty print JSON
        #[arg(long)]
        pretty: bool,

        /// Omit packet and extra data bytes
        #[arg(long)]
        no_payload: bool,
    },

    /// Summarise a unified2 file
    Stats {
        /// Input unified2 file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of signatures to list
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let tail_config = load_config(cli.config.clone());

    init_logging(cli.verbose, cli.log_format, &tail_config)?;

    match cli.command {
        Commands::Dump {
            input,
            record_type,
            num,
            follow,
            offset,
            pretty,
            no_payload,
        } => {
            let opts = DumpOptions {
                filter: record_type,
                limit: num,
                follow,
                poll_interval: tail_config.reader.poll_interval(),
                on_decode_error: tail_config.reader.decode_error_policy(),
                pretty: pretty || tail_config.output.pretty,
                include_payload: !no_payload && tail_config.output.include_payload,
            };
            dump_command(&input, offset, &opts).await
        }
        Commands::Stats { input, top } => stats_command(&input, top, &tail_config),
        Commands::Config => config_command(&tail_config),
    }
}

/// Load configuration from file/env, with fallback to defaults
fn load_config(cli_path: Option<PathBuf>) -> TailConfig {
    let loader = ConfigLoader::new().with_cli_path(cli_path);
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet
            eprintln!("Failed to load configuration: {}, using defaults", e);
            TailConfig::default()
        }
    }
}

/// Setup logging - CLI verbose flag takes precedence, then config, then default
fn init_logging(verbose: u8, format: LogFormat, config: &TailConfig) -> anyhow::Result<()> {
    let log_level = if verbose > 0 {
        match verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    } else {
        match config.logging.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    };

    // stdout carries records, logs go to stderr
    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }

    Ok(())
}

async fn dump_command(input: &Path, offset: u64, opts: &DumpOptions) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let mut reader = RecordReader::with_offset(file, offset)?;

    info!(
        "Reading {} from offset {}{}",
        input.display(),
        offset,
        if opts.follow { " (following)" } else { "" }
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let printed = run_dump(&mut reader, opts, &mut out).await?;

    let stats = reader.stats();
    info!(
        "Printed {} records; read {} records ({} bytes), next offset {}",
        printed,
        stats.records(),
        stats.bytes_consumed,
        reader.offset()
    );

    Ok(())
}

fn stats_command(input: &Path, top: usize, config: &TailConfig) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let mut reader = RecordReader::new(file)?;
    let mut summary = SpoolSummary::new();
    let policy = config.reader.decode_error_policy();

    loop {
        let offset = reader.offset();
        match reader.next_record() {
            Ok(ReadOutcome::Record(record)) => summary.observe(&record),
            Ok(ReadOutcome::EndOfStream) => break,
            Ok(ReadOutcome::Incomplete) => {
                warn!("Trailing incomplete record at offset {}", offset);
                break;
            }
            Err(err) if err.is_decode_error() && policy == DecodeErrorPolicy::Skip => {
                warn!("Skipping corrupt record at offset {}: {}", offset, err);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read record at offset {}", offset));
            }
        }
    }

    print!("{}", summary.render(reader.stats(), top));
    Ok(())
}

fn config_command(config: &TailConfig) -> anyhow::Result<()> {
    print!("{}", ConfigLoader::to_toml(config)?);
    Ok(())
}

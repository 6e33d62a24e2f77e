//! vision-pipeline CLI: run a configured filter chain and director over a
//! dump of detected contours.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vision_pipeline::{FilterRegistry, PipelineConfig, TargetsFile};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "vision-pipeline")]
#[command(about = "Filter detected contours and turn them into directions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline on one frame of contours and print the direction as JSON.
    Direct(DirectArgs),

    /// List the filter and sorter names usable in a pipeline config.
    Filters,

    /// Write the default pipeline config.
    InitConfig {
        /// Where to write the config (JSON).
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct DirectArgs {
    /// Pipeline config (JSON).
    #[arg(long)]
    config: PathBuf,

    /// Contours of one frame: `{"targets": [[[x, y], ...], ...]}`.
    #[arg(long)]
    targets: PathBuf,

    /// Log each filter step to stderr.
    #[arg(long, short)]
    verbose: bool,

    /// Emit JSON log lines (with the `tracing` feature).
    #[arg(long)]
    log_json: bool,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Direct(args) => run_direct(&args),
        Commands::Filters => {
            for name in FilterRegistry::with_builtins().names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::InitConfig { out } => {
            PipelineConfig::default().write_json(&out)?;
            println!("wrote default config to {}", out.display());
            Ok(())
        }
    }
}

fn run_direct(args: &DirectArgs) -> CliResult<()> {
    init_logging(args.verbose, args.log_json)?;

    let config = PipelineConfig::load_json(&args.config)?;
    let chain = config.build_chain(&FilterRegistry::with_builtins())?;
    let director = config.build_director()?;
    let frame = TargetsFile::load_json(&args.targets)?;

    log::info!(
        "{} contours, {} filters, {} frame",
        frame.targets.len(),
        chain.len(),
        config.frame
    );
    let targets = chain.apply(frame.targets)?;
    let direction = director.direct(&targets, &config.frame)?;
    println!("{}", serde_json::to_string(&direction)?);
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool, json: bool) -> CliResult<()> {
    if verbose {
        let _ = tracing_log::LogTracer::init();
        vision_pipeline::core::init_tracing(json);
    }
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool, _json: bool) -> CliResult<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    vision_pipeline::core::init_with_level(level)?;
    Ok(())
}

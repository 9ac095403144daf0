//! Yearset Core - annual impact series from event catalogues
//!
//! The main entry point for ys-core, handling:
//! - Building yearsets by Poisson/event-pool sampling
//! - Replaying and extracting saved sampling plans
//! - Calendar-year aggregation of event catalogues
//! - Configuration inspection

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, info_span};
use ys_common::{Error, ErrorCategory, ImpactSeries, OutputFormat, StructuredError, SCHEMA_VERSION};
use ys_config::{load_config, resolve_config, ConfigPath, ConfigSource, ValidationError, YearsetConfig};
use ys_core::exit_codes::ExitCode;
use ys_core::io::{parse_years, read_plan, read_series, render, write_json};
use ys_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use ys_core::{aggregate_by_calendar_year, extract, YearsetBuilder, YearsetOptions};

/// Yearset Core - resample event impact catalogues into annual impact series
#[derive(Parser)]
#[command(name = "ys-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to yearset.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a new yearset from an event catalogue
    Build(BuildArgs),

    /// Rebuild a yearset from a saved sampling plan
    Replay(ReplayArgs),

    /// Sum event impacts per calendar year (no sampling)
    Aggregate(AggregateArgs),

    /// List the sampled events of a plan, re-dated into their target years
    Extract(ExtractArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Event catalogue (JSON impact series)
    #[arg(long)]
    catalog: PathBuf,

    /// Target years: inclusive range (2000-2009) or comma list
    #[arg(long)]
    years: String,

    /// Poisson mean of events per year (default: total event frequency)
    #[arg(long)]
    lambda: Option<f64>,

    /// Keep the raw yearly sums instead of rescaling them
    #[arg(long)]
    no_correction: bool,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Also write the sampling plan to this file
    #[arg(long)]
    plan_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Event catalogue (JSON impact series)
    #[arg(long)]
    catalog: PathBuf,

    /// Sampling plan (JSON list of per-year event indices)
    #[arg(long)]
    plan: PathBuf,

    /// Target years, one per plan entry
    #[arg(long)]
    years: String,

    /// Keep the raw yearly sums instead of rescaling them
    #[arg(long)]
    no_correction: bool,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Event catalogue with an impact matrix
    #[arg(long)]
    catalog: PathBuf,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Event catalogue with an impact matrix
    #[arg(long)]
    catalog: PathBuf,

    /// Sampling plan (JSON list of per-year event indices)
    #[arg(long)]
    plan: PathBuf,

    /// Target years, one per plan entry
    #[arg(long)]
    years: String,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
}

/// Anything a command can fail with.
#[derive(Debug)]
enum Failure {
    Core(Error),
    Config(ValidationError),
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Core(err)
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Failure::Config(err)
    }
}

type CommandResult = std::result::Result<(), Failure>;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let result = match &cli.command {
        Commands::Build(args) => run_build(&cli.global, &run_id, args),
        Commands::Replay(args) => run_replay(&cli.global, &run_id, args),
        Commands::Aggregate(args) => run_aggregate(&cli.global, &run_id, args),
        Commands::Extract(args) => run_extract(&cli.global, &run_id, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global, &run_id),
        },
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(failure) => report_failure(&cli.global, &failure),
    };
    info!(
        event = event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        "finished"
    );
    std::process::exit(exit_code.as_i32());
}

fn run_build(global: &GlobalOpts, run_id: &str, args: &BuildArgs) -> CommandResult {
    info!(event = event_names::RUN_STARTED, command = "build", "starting");
    let (config, _) = load_settings(global, args.lambda, args.no_correction, args.seed)?;
    let years = parse_years(&args.years)?;
    let catalog = read_series(&args.catalog)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let builder = YearsetBuilder::new(YearsetOptions::from(&config));
    let lambda = builder.resolve_lambda(&catalog);
    let (yearset, plan) = builder.build(&catalog, &years, &mut rng)?;

    if let Some(path) = &args.plan_out {
        write_json(path, &plan)?;
        debug!(path = %path.display(), "wrote sampling plan");
    }

    let fingerprint = plan.fingerprint();
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "lambda": lambda,
        "seed": config.seed,
        "apply_correction": config.apply_correction,
        "fingerprint": fingerprint,
        "yearset": &yearset,
        "plan": &plan,
    });
    let summary = format!(
        "[{}] build: {} years, {} events, mean impact {:.4}, plan {}",
        run_id,
        yearset.len(),
        plan.total_events(),
        yearly_mean(&yearset),
        &fingerprint[..12]
    );
    println!("{}", render(&response, global.format, &summary)?);
    Ok(())
}

fn run_replay(global: &GlobalOpts, run_id: &str, args: &ReplayArgs) -> CommandResult {
    info!(event = event_names::RUN_STARTED, command = "replay", "starting");
    let (config, _) = load_settings(global, None, args.no_correction, None)?;
    let years = parse_years(&args.years)?;
    let catalog = read_series(&args.catalog)?;
    let plan = read_plan(&args.plan)?;

    let builder = YearsetBuilder::new(YearsetOptions::from(&config));
    let yearset = builder.build_from_plan(&catalog, &years, &plan)?;

    let fingerprint = plan.fingerprint();
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "apply_correction": config.apply_correction,
        "fingerprint": fingerprint,
        "yearset": &yearset,
    });
    let summary = format!(
        "[{}] replay: {} years, mean impact {:.4}, plan {}",
        run_id,
        yearset.len(),
        yearly_mean(&yearset),
        &fingerprint[..12]
    );
    println!("{}", render(&response, global.format, &summary)?);
    Ok(())
}

fn run_aggregate(global: &GlobalOpts, run_id: &str, args: &AggregateArgs) -> CommandResult {
    info!(event = event_names::RUN_STARTED, command = "aggregate", "starting");
    let catalog = read_series(&args.catalog)?;
    let yearly = aggregate_by_calendar_year(&catalog)?;

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "yearset": &yearly,
    });
    let summary = format!(
        "[{}] aggregate: {} events into {} calendar years",
        run_id,
        catalog.len(),
        yearly.len()
    );
    println!("{}", render(&response, global.format, &summary)?);
    Ok(())
}

fn run_extract(global: &GlobalOpts, run_id: &str, args: &ExtractArgs) -> CommandResult {
    info!(event = event_names::RUN_STARTED, command = "extract", "starting");
    let years = parse_years(&args.years)?;
    let catalog = read_series(&args.catalog)?;
    let plan = read_plan(&args.plan)?;

    let events = extract(&catalog, &years, &plan)?;

    let fingerprint = plan.fingerprint();
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "fingerprint": fingerprint,
        "events": &events,
    });
    let summary = format!(
        "[{}] extract: {} events over {} years, plan {}",
        run_id,
        events.len(),
        years.len(),
        &fingerprint[..12]
    );
    println!("{}", render(&response, global.format, &summary)?);
    Ok(())
}

fn run_config_show(global: &GlobalOpts, run_id: &str) -> CommandResult {
    let (config, resolved) = load_settings(global, None, false, None)?;

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "source": {
            "path": resolved.path.as_ref().map(|p| p.display().to_string()),
            "kind": resolved.source.to_string(),
            "using_defaults": resolved.path.is_none(),
        },
        "values": &config,
    });
    let summary = format!(
        "[{}] config: {}",
        run_id,
        resolved
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string())
    );
    println!("{}", render(&response, global.format, &summary)?);
    Ok(())
}

/// Locate, load, and validate the configuration, then apply CLI overrides.
///
/// An explicit `--config` path must exist; otherwise the standard
/// resolution order applies.
fn load_settings(
    global: &GlobalOpts,
    lambda: Option<f64>,
    no_correction: bool,
    seed: Option<u64>,
) -> std::result::Result<(YearsetConfig, ConfigPath), Failure> {
    let resolved = match &global.config {
        Some(path) => ConfigPath {
            path: Some(path.clone()),
            source: ConfigSource::CliArgument,
        },
        None => resolve_config(None),
    };

    match &resolved.path {
        Some(path) => info!(
            event = event_names::CONFIG_LOADED,
            path = %path.display(),
            source = %resolved.source,
            "loading configuration"
        ),
        None => debug!(
            event = event_names::CONFIG_DEFAULT_USED,
            "no configuration file found, using defaults"
        ),
    }

    let config = load_config(resolved.path.as_deref())?
        .with_overrides(lambda, no_correction, seed)?;
    Ok((config, resolved))
}

fn yearly_mean(series: &ImpactSeries) -> f64 {
    ys_math::mean(series.at_event())
}

/// Print the failure on stderr and pick the exit code.
fn report_failure(global: &GlobalOpts, failure: &Failure) -> ExitCode {
    let (structured, human, exit_code) = match failure {
        Failure::Core(err) => (
            StructuredError::from(err),
            err.format_human(),
            ExitCode::from(err),
        ),
        Failure::Config(err) => {
            let category = match err {
                ValidationError::IoError(_) => ErrorCategory::Io,
                _ => ErrorCategory::Config,
            };
            let structured = StructuredError {
                code: err.code(),
                category,
                message: err.to_string(),
                recoverable: true,
                context: Default::default(),
            };
            (
                structured,
                format!("✗ Configuration Error\n  Reason: {}", err),
                ExitCode::from(err),
            )
        }
    };

    error!(
        event = event_names::RUN_FAILED,
        code = structured.code,
        category = %structured.category,
        "{}",
        structured.message
    );

    match global.format {
        OutputFormat::Json | OutputFormat::Pretty => eprintln!("{}", structured.to_json()),
        OutputFormat::Summary => eprintln!("{}", human),
    }
    exit_code
}

//! Command-line interface for the property valuation engine

mod render;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use valuation_core::{ValuationEngine, ValuationPolicy, ValuationRequest};
use valuation_utils::Config;

#[derive(Parser, Debug)]
#[command(name = "valuation")]
#[command(about = "Estimate a property's value interval from its sale and street comparables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate a value interval from a request file
    Estimate(EstimateArgs),
    /// Print the default calculation policy as JSON
    Policy,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Request JSON with propertyDetails, marketData and technicalData ('-' reads stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Reference date for ages and elapsed years (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,

    /// Policy JSON overriding the default calculation constants
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Include every adjustment step in the output
    #[arg(long)]
    explain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    valuation_utils::init_tracing_with(&config);

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    match cli.command {
        Command::Estimate(args) => {
            println!("{}", run_estimate(&args)?);
            Ok(())
        }
        Command::Policy => {
            println!("{}", serde_json::to_string_pretty(&ValuationPolicy::default())?);
            Ok(())
        }
    }
}

/// Run one estimate and return the rendered output
fn run_estimate(args: &EstimateArgs) -> anyhow::Result<String> {
    let request: ValuationRequest = serde_json::from_str(&read_source(&args.input)?)
        .with_context(|| format!("Failed to parse valuation request from {}", args.input.display()))?;

    let policy = match &args.policy {
        Some(path) => {
            let json = read_source(path)?;
            ValuationPolicy::from_json(&json)
                .with_context(|| format!("Failed to load policy from {}", path.display()))?
        }
        None => ValuationPolicy::default(),
    };

    let engine = ValuationEngine::new(policy)?;
    info!(
        comparables = request.market_data.comparables_count(),
        "Estimating property value"
    );
    let valuation = engine
        .estimate_request(&request, args.as_of)
        .context("Valuation failed")?;

    let output = match args.format {
        OutputFormat::Table => render::table(&valuation, args.explain),
        OutputFormat::Json => render::json(&valuation, args.explain)?,
    };

    Ok(output)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

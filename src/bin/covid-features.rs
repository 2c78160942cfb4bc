use clap::{Parser, Subcommand};
use covid_features::config::{FeatureConfig, PipelineConfig};
use covid_features::io::{self, LocalDatasetProvider};
use covid_features::pipeline::{self, country_timeline, TimelineColumn};
use covid_features::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "covid-features",
    disable_help_subcommand = true,
    about = "Filter case counts and compute doubling times",
    long_about = "Reshape the cumulative confirmed-cases table, smooth each region's series and estimate doubling times over a three-day window.",
    after_help = "Set RUST_LOG to adjust log verbosity (default: info)."
)]
struct Cli {
    #[arg(
        long = "data-path",
        value_name = "DIR",
        default_value = "data/",
        help = "Path to the data folder holding raw/ and processed/"
    )]
    data_path: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reshape the raw wide table into the relational table.
    Relational,
    /// Compute smoothed counts and doubling times from the relational table.
    Features,
    /// Run the relational and feature stages in sequence.
    Run,
    /// Print one country's aggregated series from the enriched table.
    Timeline {
        #[arg(long, help = "Country/Region name as it appears in the data")]
        country: String,
        #[arg(
            long,
            default_value = "confirmed",
            help = "confirmed, confirmed_filtered, confirmed_DR or confirmed_filtered_DR"
        )]
        column: String,
    },
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = PipelineConfig::new(cli.data_path);
    match cli.command {
        Command::Relational => relational(&paths).map(|_| ()),
        Command::Features => features(&paths),
        Command::Run => {
            relational(&paths)?;
            features(&paths)
        }
        Command::Timeline { country, column } => {
            let column = TimelineColumn::from_name(&column)?;
            let table = io::read_enriched_file(&paths.enriched_path())?;
            for (date, value) in country_timeline(&table, &country, column) {
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                println!("{};{}", date.format("%Y-%m-%d"), value);
            }
            Ok(())
        }
    }
}

fn relational(paths: &PipelineConfig) -> Result<usize> {
    paths.ensure_layout()?;
    let provider = LocalDatasetProvider::new(paths.wide_table_path());
    pipeline::run_relational_stage(paths, &provider)
}

fn features(paths: &PipelineConfig) -> Result<()> {
    let report = pipeline::run_feature_stage(paths, FeatureConfig::default())?;
    info!(
        rows = report.rows,
        groups = report.groups,
        short_groups = report.warnings.len(),
        "wrote {}",
        paths.enriched_path().display()
    );
    Ok(())
}

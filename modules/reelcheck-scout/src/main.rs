use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reelcheck_common::{AggregationStrategy, Config, DeepAnalysis, RawEvidence, Settings};
use reelcheck_scout::{FactCheckDeps, FactChecker};
use reelcheck_verdict::Aggregator;

#[derive(Parser)]
#[command(name = "reelcheck", about = "Fact-check a claim against news coverage")]
struct Cli {
    /// TOML settings file. Defaults apply when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a JSON array of evidence offline and print the result.
    Aggregate {
        #[arg(long)]
        input: PathBuf,
        /// Deep analysis of the most recent item, as JSON.
        #[arg(long)]
        deep: Option<PathBuf>,
        /// Overrides the strategy from the settings file.
        #[arg(long)]
        strategy: Option<AggregationStrategy>,
    },
    /// Run the full search-and-analyze pipeline for one claim.
    Check {
        #[arg(long)]
        claim: String,
        #[arg(long, default_value = "cli")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reelcheck=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.settings.as_deref())?;

    match cli.command {
        Command::Aggregate {
            input,
            deep,
            strategy,
        } => {
            let raw: Vec<RawEvidence> = read_json(&input)?;
            let deep: Option<DeepAnalysis> = deep.as_deref().map(read_json).transpose()?;

            let mut aggregator = Aggregator::from_settings(&settings.aggregation);
            if let Some(strategy) = strategy {
                aggregator = aggregator.with_strategy(strategy);
            }

            info!(evidence = raw.len(), strategy = %aggregator.strategy(), "Aggregating");
            let result = aggregator.aggregate(&raw, deep.as_ref());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Check { claim, user } => {
            let config = Config::from_env()?;
            config.log_redacted();

            let checker = FactChecker::new(FactCheckDeps::from_config(&config)?, &settings);
            let record = checker.check(&user, &claim).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

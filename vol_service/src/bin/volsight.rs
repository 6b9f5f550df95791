use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vol_service::{AppConfig, ErrorBody, ServiceError, VolatilityService};

#[derive(Parser)]
#[command(version, about = "Volatility analytics over cached daily prices")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create or upgrade the price cache schema
    Init,

    /// Print the volatility report for a ticker as JSON
    Vol {
        ticker: String,

        /// Years of history to analyze (defaults to the configured value)
        #[arg(long)]
        lookback_years: Option<u32>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the last refresh date stored for a ticker
    Freshness { ticker: String },

    /// Print the health payload
    Health,
}

fn fail(err: ServiceError) -> anyhow::Error {
    let class = err.class();
    let body = serde_json::to_string(&ErrorBody::from(&err)).unwrap_or_else(|_| err.detail());
    anyhow::anyhow!("{:?} ({}): {}", class, class.status_code(), body)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Cmd::Health = cli.cmd {
        println!("{}", serde_json::to_string(&VolatilityService::health())?);
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let service = VolatilityService::from_config(&config).map_err(fail)?;
    service.initialize().map_err(fail)?;

    match cli.cmd {
        Cmd::Init => {
            info!(database_url = %config.database_url, "price cache initialized");
        }
        Cmd::Vol {
            ticker,
            lookback_years,
            pretty,
        } => {
            let report = service
                .get_volatility(&ticker, lookback_years)
                .await
                .map_err(fail)?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        Cmd::Freshness { ticker } => match service.freshness(&ticker).map_err(fail)? {
            Some(day) => println!("{day}"),
            None => println!("never"),
        },
        Cmd::Health => bail!("health is answered before the service starts"),
    }

    Ok(())
}

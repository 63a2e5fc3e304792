mod cli;
mod config;
mod constants;
mod display;
mod download;
mod error;
mod parquet;
mod plot;
mod reading;
mod series;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::{command, Cli, Commands};
use config::Config;
use env_logger::Env;
use reading::StationFilter;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(files) => {
            for file in files {
                println!("File saved to `{}`", file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Vec<std::path::PathBuf>> {
    let config = Config::new(cli.cache_dir, cli.output_dir, cli.max_rows, cli.refresh)?;

    match cli.command {
        Commands::Stations {
            country,
            state,
            bbox,
            name,
            parquet,
        } => {
            let filter = StationFilter {
                country: Some(country),
                state,
                bbox,
                name,
            };
            command::stations(&config, &filter, parquet).await
        }
        Commands::Daily {
            station_ids,
            element,
            from,
            to,
            rule,
            agg,
            rolling,
            rolling_agg,
            drop_flagged,
            parquet,
        } => {
            let request = command::DailyRequest {
                element,
                from,
                to,
                rule,
                aggregation: agg,
                rolling,
                rolling_aggregation: rolling_agg,
                drop_flagged,
                parquet,
                title: None,
            };
            command::daily(&config, &station_ids, &request).await
        }
        Commands::Ao {
            file,
            threshold,
            window,
            center,
            parquet,
        } => command::ao(&config, file.as_deref(), threshold, window, center, parquet).await,
        Commands::Explore {} => command::explore(&config).await,
    }
}

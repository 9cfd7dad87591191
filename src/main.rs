//! Tenki - current weather conditions for any city
//!
//! A command-line tool that resolves current weather from OpenWeatherMap
//! through a one-hour read-through cache and prints a small report.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tenki::cache::{CacheManager, CacheStore, MemoryStore};
use tenki::cli::{Cli, Command, LookupRequest};
use tenki::config::Config;
use tenki::data::{FetchError, OpenWeatherClient, WeatherReport};
use tenki::resolver::WeatherResolver;

/// Timeout for requests to the weather API
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed CLI to a subcommand or a weather lookup
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(Command::SetKey { key }) = &cli.command {
        let mut config = Config::load().context("failed to load configuration")?;
        config.api_key = key.clone();
        config.save().context("failed to save configuration")?;
        println!("API key saved to {}", Config::default_path()?.display());
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load().context("failed to load configuration")?;
    let request = LookupRequest::from_cli(&cli, &config);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("failed to build HTTP client")?;
    let client = OpenWeatherClient::with_client(http).with_language(config.language.clone());

    match CacheManager::new() {
        Some(store) => lookup(&request, &config, client, store).await,
        None => {
            tracing::warn!("no cache directory available, caching in memory for this run only");
            lookup(&request, &config, client, MemoryStore::new()).await
        }
    }
}

/// Resolves one lookup request and renders the result
async fn lookup<S: CacheStore>(
    request: &LookupRequest,
    config: &Config,
    client: OpenWeatherClient,
    store: S,
) -> anyhow::Result<ExitCode> {
    let resolver = WeatherResolver::new(client, store, config.api_key.clone());

    match resolver.resolve(&request.location, request.unit).await {
        Ok(observation) => {
            let report = WeatherReport::new(&observation, request.unit);
            if request.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if request.json {
                let payload = serde_json::json!({
                    "error": { "kind": error.kind(), "message": error.to_string() }
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print_error(&error);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints a plain-text weather report
fn print_report(report: &WeatherReport) {
    if report.description.is_empty() {
        println!("{}", report.city);
    } else {
        println!("{}  {}", report.city, report.description);
    }
    println!("  Temperature  {}{}", report.temperature, report.unit);
    println!("  Feels like   {}{}", report.feels_like, report.unit);
    println!("  Humidity     {}%", report.humidity);
    println!("  Icon         {}", report.icon_url);
}

/// Prints an explanatory fragment for a failed resolution
fn print_error(error: &FetchError) {
    match error {
        FetchError::MissingCredential => {
            eprintln!("No API key is configured.");
            eprintln!("Get a free key at https://openweathermap.org/api and run:");
            eprintln!("  tenki set-key <KEY>");
        }
        FetchError::Transport(message) => {
            eprintln!("Could not reach the weather service: {}", message);
        }
        FetchError::UpstreamRejected(message) => {
            eprintln!("The weather service rejected the request: {}", message);
            eprintln!("Check the city name (e.g. Tokyo, Osaka, London).");
        }
    }
}

//! Command-line interface parsing for the tenki CLI
//!
//! This module handles parsing of CLI arguments using clap, including the
//! `set-key` subcommand that stores the API key in the config file.

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::data::Unit;

/// Tenki CLI - current weather conditions in your terminal
#[derive(Parser, Debug)]
#[command(name = "tenki")]
#[command(about = "Current weather conditions for any city, cached for an hour")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// City to look up (e.g. Tokyo, Osaka, London)
    ///
    /// Defaults to the configured default location.
    pub location: Option<String>,

    /// Temperature unit
    #[arg(long, value_enum)]
    pub unit: Option<Unit>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands for managing configuration
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the OpenWeatherMap API key in the config file
    SetKey {
        /// The API key (free tier keys work; see openweathermap.org/api)
        key: String,
    },
}

/// A fully resolved lookup request: CLI arguments with config defaults applied
#[derive(Debug, Clone)]
pub struct LookupRequest {
    /// City to look up
    pub location: String,
    /// Temperature unit to request
    pub unit: Unit,
    /// Whether to print JSON
    pub json: bool,
}

impl LookupRequest {
    /// Combines parsed CLI arguments with configured defaults
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self {
            location: cli
                .location
                .clone()
                .unwrap_or_else(|| config.default_location.clone()),
            unit: cli.unit.unwrap_or(config.default_unit),
            json: cli.json,
        }
    }
}

use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::analyze::AnalyzeArgs;
use commands::config::ConfigCommands;
use config::{AppConfig, ConfigOverrides};

#[derive(Parser)]
#[command(name = "nape")]
#[command(about = "NAPE - Nuance-Adjusted Predictive Engine for project analytics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal dashboard
    Dashboard {
        /// Propagate PMS failures instead of substituting mock data
        #[arg(long)]
        no_fallback: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// List projects from the configured source
    Projects {
        /// Propagate PMS failures instead of substituting mock data
        #[arg(long)]
        no_fallback: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Analyze a project and print the model's verdict
    Analyze(AnalyzeArgs),
    /// Manage stored credentials and settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match handle_command(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Dashboard {
            no_fallback,
            overrides,
        } => {
            let config = AppConfig::load()?.apply(overrides);
            commands::dashboard::dashboard(&config, no_fallback).await
        }
        Commands::Projects {
            no_fallback,
            overrides,
        } => {
            let config = AppConfig::load()?.apply(overrides);
            commands::projects::list_projects(&config, no_fallback).await
        }
        Commands::Analyze(args) => {
            let config = AppConfig::load()?.apply(args.overrides.clone());
            commands::analyze::analyze(&config, args).await
        }
        Commands::Config(config_cmd) => commands::config::handle_config_command(config_cmd).await,
    }
}

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::{mask_key, AppConfig, ConfigFile, ConfigOverrides};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration (keys masked)
    Show,
    /// Store credentials and settings in the config file
    Set {
        #[command(flatten)]
        values: ConfigOverrides,
    },
}

pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { values } => set(values),
    }
}

fn show() -> Result<()> {
    let config = AppConfig::load()?;
    let masked = |key: &Option<String>| match key {
        Some(key) => mask_key(key),
        None => "(not set)".to_string(),
    };

    println!("PMS URL:        {}", config.pms_url);
    println!("PMS API key:    {}", masked(&config.pms_api_key));
    println!("Model API key:  {}", masked(&config.gemini_api_key));
    println!("Model:          {}", config.model);
    println!();
    println!(
        "{}",
        format!("Config file: {}", ConfigFile::path()?.display()).dimmed()
    );
    Ok(())
}

fn set(values: ConfigOverrides) -> Result<()> {
    let mut file = ConfigFile::load()?;
    if values.pms_url.is_some() {
        file.pms_url = values.pms_url;
    }
    if values.pms_api_key.is_some() {
        file.pms_api_key = values.pms_api_key;
    }
    if values.gemini_api_key.is_some() {
        file.gemini_api_key = values.gemini_api_key;
    }
    if values.model.is_some() {
        file.model = values.model;
    }

    let path = file.save()?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}

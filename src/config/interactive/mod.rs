use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, ConfigError, OllamaConfig, RetrievalConfig, get_config_dir};
use crate::embeddings::OllamaClient;

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("Answerbox Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Ollama Configuration").bold().yellow());
    eprintln!("Configure your local Ollama instance for embedding generation.");
    eprintln!();

    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Retrieval Configuration").bold().yellow());
    configure_retrieval(&mut config.retrieval)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_ollama_connection(&config) {
        eprintln!("{}", style("✓ Ollama connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not reach Ollama or the model is unavailable").yellow()
        );
        eprintln!(
            "You can continue, but make sure Ollama is running and the model is pulled before \
             asking questions."
        );
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Protocol: {}", style(&config.ollama.protocol).cyan());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!("  Model: {}", style(&config.ollama.model).cyan());
    eprintln!("  Batch Size: {}", style(config.ollama.batch_size).cyan());

    eprintln!();
    eprintln!("{}", style("Retrieval Settings:").bold().yellow());
    eprintln!(
        "  Match Threshold: {}",
        style(config.retrieval.match_threshold).cyan()
    );
    eprintln!(
        "  Fallback Response: {}",
        style(&config.retrieval.fallback_response).cyan()
    );

    eprintln!();
    match config.ollama_url() {
        Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    if config_dir.join("config.toml").exists() {
        eprintln!("{}", style("Found existing configuration.").green());
    } else {
        eprintln!(
            "{}",
            style("No existing configuration found. Using defaults.").yellow()
        );
    }
    Config::load(&config_dir)
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == ollama.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Ollama protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;

    ollama.protocol = protocols[protocol_index].to_string();

    ollama.host = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .interact_text()?;

    ollama.port = Input::new()
        .with_prompt("Ollama port")
        .default(ollama.port)
        .validate_with(|input: &u16| -> Result<(), ConfigError> {
            if *input == 0 {
                Err(ConfigError::InvalidPort(*input))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ollama.model = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.model.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            if input.trim().is_empty() {
                Err(ConfigError::InvalidModel(input.clone()))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ollama.batch_size = Input::new()
        .with_prompt("Embedding batch size")
        .default(ollama.batch_size)
        .validate_with(|input: &u32| -> Result<(), ConfigError> {
            if (1..=1000).contains(input) {
                Ok(())
            } else {
                Err(ConfigError::InvalidBatchSize(*input))
            }
        })
        .interact_text()?;

    Ok(())
}

fn configure_retrieval(retrieval: &mut RetrievalConfig) -> Result<()> {
    retrieval.match_threshold = Input::new()
        .with_prompt("Match threshold (a score must strictly exceed this to count as a match)")
        .default(retrieval.match_threshold)
        .validate_with(|input: &f32| -> Result<(), ConfigError> {
            if *input > 0.0 && *input < 1.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidMatchThreshold(*input))
            }
        })
        .interact_text()?;

    retrieval.fallback_response = Input::new()
        .with_prompt("Fallback response for unanswered questions")
        .default(retrieval.fallback_response.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            if input.trim().is_empty() {
                Err(ConfigError::EmptyFallbackResponse)
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(())
}

fn test_ollama_connection(config: &Config) -> bool {
    OllamaClient::new(config)
        .and_then(|client| client.health_check())
        .is_ok()
}

use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, StoredConfig,
    config_file_path,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring triage CLI.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt("LLM provider (openai)", &mut cfg.llm_provider, false)?;
    apply_prompt("OpenAI API key", &mut cfg.openai_api_key, true)?;
    apply_prompt(
        "OpenAI-compatible base URL",
        &mut cfg.openai_base_url,
        false,
    )?;
    apply_prompt("Model", &mut cfg.model, false)?;
    apply_prompt(
        "Request timeout in seconds",
        &mut cfg.request_timeout_secs,
        false,
    )?;
    apply_prompt("Max retries", &mut cfg.max_retries, false)?;
    apply_prompt(
        "Cache model replies (true/false)",
        &mut cfg.cache_enabled,
        false,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("LLM provider: {}", display_value(&cfg.llm_provider, "openai"));
    println!("OpenAI API key: {}", mask_secret(&cfg.openai_api_key));
    println!(
        "Base URL: {}",
        display_value(&cfg.openai_base_url, DEFAULT_BASE_URL)
    );
    println!("Model: {}", display_value(&cfg.model, DEFAULT_MODEL));
    println!(
        "Request timeout: {}",
        display_value(
            &cfg.request_timeout_secs,
            &format!("{DEFAULT_TIMEOUT_SECS}s")
        )
    );
    println!(
        "Max retries: {}",
        display_value(&cfg.max_retries, &DEFAULT_MAX_RETRIES.to_string())
    );
    println!("Reply cache: {}", display_value(&cfg.cache_enabled, "true"));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("<default: {default}>"))
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 => {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_and_short_secrets() {
        assert_eq!(mask_secret(&Some("sk-abcdef123".to_string())), "sk-***123");
        assert_eq!(mask_secret(&Some("abc".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
    }

    #[test]
    fn interprets_prompt_input() {
        assert_eq!(PromptAction::from_input("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::from_input(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::from_input("gpt-4o-mini\n"),
            PromptAction::Set("gpt-4o-mini".to_string())
        );
    }

    #[test]
    fn shows_defaults_for_unset_values() {
        assert_eq!(display_value(&None, "gpt-3.5-turbo"), "<default: gpt-3.5-turbo>");
        assert_eq!(display_value(&Some("x".to_string()), "y"), "x");
    }
}

//! Command handlers for the confirm CLI

use anyhow::{Context, Result};
use confirm_core::gateway::{DiscordEventStream, DiscordHttp};
use confirm_core::models::{
    ChannelId, Color, Configuration, Outcome, PromptOptions, User, UserId, MAX_TIMEOUT_SECS,
};
use confirm_core::services::logging;
use confirm_core::{ConfirmationPrompt, Destination};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of `confirm ask`
pub struct AskArgs {
    pub text: String,
    pub channel: String,
    pub user: String,
    pub timeout: Option<u32>,
    pub color: Option<String>,
    pub hide_author: bool,
    pub config_file: Option<String>,
    pub json: bool,
}

/// Post a prompt into a channel and report the outcome
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let config = load_config(args.config_file.as_deref())?;
    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!(
            "Invalid configuration: {}",
            errors.join("; ")
        ));
    }
    // A subscriber may already be installed by the embedding process.
    let _ = logging::init_logging(config.log_level.clone());

    let token = config.resolved_token().ok_or_else(|| {
        anyhow::anyhow!("No bot token: set DISCORD_TOKEN or bot_token in the config file")
    })?;
    let channel_id: ChannelId = args
        .channel
        .parse()
        .with_context(|| format!("Invalid channel id: {}", args.channel))?;
    let user_id: UserId = args
        .user
        .parse()
        .with_context(|| format!("Invalid user id: {}", args.user))?;
    let color = match args.color.as_deref() {
        Some(raw) => raw.parse::<Color>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.color(),
    };
    let timeout = match args.timeout {
        Some(secs) => check_timeout(secs)?,
        None => config.timeout_seconds,
    };

    let http = Arc::new(DiscordHttp::with_base_url(
        token.clone(),
        config.api_base_url.clone(),
    ));
    let user = match http.fetch_user(user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "Could not look up user; attributing by id");
            User::new(user_id, user_id.to_string())
        }
    };

    let events =
        DiscordEventStream::new(config.gateway_url.clone(), token, http.hub().clone()).spawn();

    if !args.json {
        println!("📤 Posting confirmation to channel {}", channel_id);
        println!("⏳ Waiting up to {}s for {}...", timeout, user.name);
    }

    let options = PromptOptions::default()
        .timeout_secs(u64::from(timeout))
        .hide_author(args.hide_author || config.hide_author);
    let mut prompt = ConfirmationPrompt::new(http.clone()).with_color(color);
    let result = prompt
        .start(
            &args.text,
            Some(user),
            Some(Destination::Channel(channel_id)),
            options,
        )
        .await;
    events.abort();
    let outcome = result.context("Failed to run confirmation prompt")?;

    if args.json {
        let json_response = serde_json::json!({
            "outcome": outcome,
            "confirmed": outcome.as_bool(),
            "channel_id": channel_id,
            "message_id": prompt.message().map(|m| m.message_id),
        });
        println!("{}", serde_json::to_string_pretty(&json_response)?);
    } else {
        match outcome {
            Outcome::Confirmed => println!("✅ Confirmed"),
            Outcome::Declined => println!("❌ Declined"),
            Outcome::TimedOut => println!("⏱️  Timed out: no answer received"),
        }
    }

    match outcome {
        Outcome::Confirmed => Ok(()),
        Outcome::Declined => Err(anyhow::anyhow!("Confirmation declined")),
        Outcome::TimedOut => Err(anyhow::anyhow!("Confirmation timed out")),
    }
}

/// Interactive configuration setup
pub fn handle_config_init(config_file: Option<String>) -> Result<()> {
    println!("⚙️  Initializing discord-confirm configuration");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config_path = resolve_config_path(config_file.as_deref())?;
    println!("📄 Config file: {}", config_path.display());

    let mut config = if config_path.exists() {
        println!("⚠️  Configuration file already exists. Loading existing values...");
        Configuration::load_from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load existing config: {}", e))?
    } else {
        println!("✨ Creating new configuration with defaults...");
        Configuration::default()
    };

    println!("\n📝 Please answer the following questions (press Enter to keep the current value):\n");

    let token_hint = if config.bot_token.is_some() { "set" } else { "unset" };
    let token_input = ask_line(&format!("Bot token [{}]: ", token_hint))?;
    if !token_input.is_empty() {
        config.bot_token = Some(token_input);
    }

    let timeout_input = ask_line(&format!(
        "Default timeout in seconds [{}]: ",
        config.timeout_seconds
    ))?;
    if !timeout_input.is_empty() {
        match timeout_input.parse::<u32>() {
            Ok(timeout) => config.timeout_seconds = timeout,
            Err(_) => println!("⚠️  Invalid timeout value, keeping {}", config.timeout_seconds),
        }
    }

    let color_input = ask_line(&format!("Default embed color [{}]: ", config.color()))?;
    if !color_input.is_empty() {
        match color_input.parse::<Color>() {
            Ok(color) => config.default_color = color.0,
            Err(e) => println!("⚠️  {}, keeping {}", e, config.color()),
        }
    }

    if let Err(errors) = config.validate() {
        println!("\n❌ Configuration is invalid:");
        for error in &errors {
            println!("   - {}", error);
        }
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }

    config
        .save_to_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to save config: {}", e))?;
    println!("\n✅ Configuration saved to {}", config_path.display());
    Ok(())
}

/// Print the effective configuration with the token masked
pub fn handle_config_show(config_file: Option<String>) -> Result<()> {
    let config_path = resolve_config_path(config_file.as_deref())?;
    let config = Configuration::load_from_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    println!("# {}", config_path.display());
    let shown = toml::to_string_pretty(&config.redacted())
        .context("Failed to render configuration")?;
    println!("{}", shown);
    if config.resolved_token().is_none() {
        println!("# no bot token configured (set DISCORD_TOKEN or bot_token)");
    }
    match config.validate() {
        Ok(()) => println!("# configuration is valid"),
        Err(errors) => {
            for error in errors {
                println!("# invalid: {}", error);
            }
        }
    }
    Ok(())
}

fn load_config(config_file: Option<&str>) -> Result<Configuration> {
    let path = resolve_config_path(config_file)?;
    Configuration::load_from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}

fn resolve_config_path(config_file: Option<&str>) -> Result<PathBuf> {
    match config_file {
        Some(path) if path.starts_with("~/") => {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            Ok(PathBuf::from(path.replacen("~/", &format!("{}/", home), 1)))
        }
        Some(path) => Ok(PathBuf::from(path)),
        None => Configuration::default_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to get default config path: {}", e)),
    }
}

/// `--timeout` gets the same bounds as `timeout_seconds` in the config file.
fn check_timeout(secs: u32) -> Result<u32> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(anyhow::anyhow!(
            "--timeout must be between 1 and {} seconds, got {}",
            MAX_TIMEOUT_SECS,
            secs
        ));
    }
    Ok(secs)
}

fn ask_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_config_path() {
        let path = resolve_config_path(Some("/tmp/confirm.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/confirm.toml"));
    }

    #[test]
    fn test_resolve_home_relative_config_path() {
        if let Ok(home) = std::env::var("HOME") {
            let path = resolve_config_path(Some("~/confirm.toml")).unwrap();
            assert_eq!(path, PathBuf::from(home).join("confirm.toml"));
        }
    }

    #[test]
    fn test_timeout_flag_bounds() {
        assert_eq!(check_timeout(1).unwrap(), 1);
        assert_eq!(check_timeout(900).unwrap(), 900);
        assert!(check_timeout(0).is_err());
        let err = check_timeout(5000).unwrap_err();
        assert!(err.to_string().contains("between 1 and 900"));
    }

    #[test]
    fn test_missing_config_file_loads_defaults() {
        let config = load_config(Some("/nonexistent/discord-confirm/config.toml")).unwrap();
        assert_eq!(config.timeout_seconds, 20);
    }
}

use crate::config::Config;
use crate::utils::get_leylo_home;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_leylo_home()?.join("config.json"))
}

/// Load the config from `config_path`, or from `~/.leylo/config.json` when
/// none is given. A missing file yields the defaults; env overrides apply
/// either way.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config);
    config
        .validate()
        .with_context(|| "Configuration validation failed")?;
    Ok(config)
}

/// Env beats config.json for credentials.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(token) = env::var("TELEGRAM_BOT_TOKEN")
        && !token.is_empty()
    {
        config.telegram.bot_token = token;
    }
    if let Ok(key) = env::var("OPENAI_API_KEY")
        && !key.is_empty()
    {
        config.generator.api_key = key;
    }
}

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The three identity tokens the Knowby API requires on every request.
/// Resolved once at startup and threaded into the API client; nothing else
/// reads credential state.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub authorization: String,
    pub member_id: String,
    pub organisation_id: String,
}

/// The `[knowby]` block from config.toml.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct KnowbyConfig {
    pub authorization: Option<String>,
    pub member_id: Option<String>,
    pub organisation_id: Option<String>,
    pub base_url: Option<String>,
}

/// Top-level kbscrape config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct KbConfig {
    pub knowby: Option<KnowbyConfig>,
}

impl KbConfig {
    /// Load config from ~/.kbscrape/config.toml. Returns default if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(KbConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: KbConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }
}

/// Resolve a credential through the chain: CLI flag / env var > config key.
/// clap folds the env var into the flag value before this runs.
pub fn resolve_credential(
    cli_flag: Option<String>,
    config_value: Option<String>,
    flag: &str,
    env_var_name: &str,
) -> Result<String> {
    if let Some(value) = cli_flag {
        if !value.is_empty() {
            return Ok(value);
        }
    }

    if let Some(value) = config_value {
        if !value.is_empty() {
            return Ok(value);
        }
    }

    bail!(
        "Missing credential. Provide via {}, {} env var, or ~/.kbscrape/config.toml",
        flag,
        env_var_name
    );
}

/// Path to the config file: ~/.kbscrape/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".kbscrape").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.kbscrape/config.toml
# Credential resolution order: CLI flag > env var > config key

[knowby]
# authorization = "Bearer your-token"
# member_id = "your-member-id"
# organisation_id = "your-organisation-id"
# base_url = "https://knowby-pro-backend-prod-qt5p6426oq-ts.a.run.app"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

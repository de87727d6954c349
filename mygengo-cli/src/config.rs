use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Contents of the config file, eg:
///
/// ```toml
/// api_key = "<Your API key>"
/// private_key = "<Your private key>"
/// sandbox = true  # the default, false to use the real API
/// ```
#[derive(Deserialize)]
pub struct Config {
    pub api_key: String,
    pub private_key: String,
    #[serde(default = "default_sandbox")]
    pub sandbox: bool,
}

fn default_sandbox() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&file_str).with_context(|| format!("invalid config {}", path.display()))
    }

    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

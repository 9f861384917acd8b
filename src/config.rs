use std::path::{Path, PathBuf};

use clap::Parser;

pub const DEFAULT_API_BASE: &str = "https://waystation.ai";

const APP_DIR: &str = "WayStation";
const TOKEN_FILE: &str = "token";
const ONBOARDING_MARKER: &str = "onboarding_completed";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine a configuration directory; set WAY_CONFIG_DIR")]
    NoHome,
}

/// WayStation MCP bridge. Speaks MCP on stdio and forwards tool calls to the WayStation API.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Fallback API key, used when neither WAY_KEY nor the token file provide one
    pub token: Option<String>,

    /// Base URL of the WayStation API
    #[arg(long, env = "WAY_BASE", default_value = DEFAULT_API_BASE)]
    pub base: String,

    /// Directory holding the token file and onboarding marker
    #[arg(long, env = "WAY_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// API key taking precedence over every other source
    #[arg(long = "way-key", env = "WAY_KEY", hide = true, hide_env_values = true)]
    pub env_key: Option<String>,
}

/// Host platforms the launch action knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unsupported(String),
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            other => Platform::Unsupported(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub config_dir: PathBuf,
    pub env_key: Option<String>,
    pub arg_key: Option<String>,
    pub platform: Platform,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let config_dir = match cli.config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        Ok(Self {
            api_base: normalize_base(&cli.base),
            config_dir,
            env_key: non_empty(cli.env_key),
            arg_key: non_empty(cli.token),
            platform: Platform::current(),
        })
    }

    pub fn token_path(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE)
    }
}

pub fn marker_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(ONBOARDING_MARKER)
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR));
    }
    dirs::home_dir()
        .map(|home| home.join(".waystation"))
        .ok_or(ConfigError::NoHome)
}

fn normalize_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_base() {
        assert_eq!(normalize_base("https://waystation.ai/"), "https://waystation.ai");
        assert_eq!(normalize_base("http://localhost:3000"), "http://localhost:3000");
    }

    #[test]
    fn recognizes_known_platforms() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("linux"), Platform::Unsupported("linux".into()));
    }

    #[test]
    fn parses_positional_token_and_base_flag() {
        let cli = Cli::try_parse_from([
            "waystation-mcp",
            "--base",
            "http://localhost:9000/",
            "--config-dir",
            "/tmp/ws",
            "key-123",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("key-123"));

        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.arg_key.as_deref(), Some("key-123"));
        assert_eq!(config.token_path(), PathBuf::from("/tmp/ws/token"));
        assert_eq!(marker_path_in(&config.config_dir), PathBuf::from("/tmp/ws/onboarding_completed"));
    }

    #[test]
    fn api_key_is_kept_out_of_help() {
        let cli = Cli::try_parse_from(["waystation-mcp", "--way-key", "env-key", "arg-key"]).unwrap();
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.env_key.as_deref(), Some("env-key"));
        assert_eq!(config.arg_key.as_deref(), Some("arg-key"));

        let help = <Cli as clap::CommandFactory>::command().render_help().to_string();
        assert!(!help.contains("way-key"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(Some("k".into())), Some("k".into()));
    }
}

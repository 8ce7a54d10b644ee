//! # Configuration
//!
//! Application configuration is read from a YAML file and then overridden by
//! environment variables.
//!
//! ```yaml
//! server:
//!   addr: 0.0.0.0:8080
//!   stack_size: 0x10000
//! views:
//!   dir: views
//! client:
//!   container_id: view-container
//!   pass_thru_attribute: data-pass-thru
//! ```
//!
//! ## Environment Variables
//!
//! - `ISOVIEW_ADDR` - bind address
//! - `ISOVIEW_STACK_SIZE` - coroutine stack size, decimal (`65536`) or hex (`0x10000`)
//! - `ISOVIEW_VIEWS_DIR` - template directory
//! - `ISOVIEW_CONTAINER_ID` - client container element id

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Default id of the element client renders replace.
pub const DEFAULT_CONTAINER_ID: &str = "view-container";

/// Default attribute that opts an anchor out of client-side routing.
pub const DEFAULT_PASS_THRU_ATTRIBUTE: &str = "data-pass-thru";

const DEFAULT_STACK_SIZE: usize = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    /// Coroutine stack size in bytes. Accepts `0x` hex in YAML as a string.
    #[serde(deserialize_with = "deserialize_stack_size")]
    pub stack_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    pub dir: PathBuf,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("views"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub container_id: String,
    pub pass_thru_attribute: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            pass_thru_attribute: DEFAULT_PASS_THRU_ATTRIBUTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub views: ViewsConfig,
    pub client: ClientConfig,
}

impl AppConfig {
    /// Load from a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// # Errors
    ///
    /// Fails when `content` is not valid YAML for this shape.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_env(&mut self) {
        if let Ok(addr) = env::var("ISOVIEW_ADDR") {
            self.server.addr = addr;
        }
        if let Some(size) = env::var("ISOVIEW_STACK_SIZE")
            .ok()
            .and_then(|s| parse_stack_size(&s))
        {
            self.server.stack_size = size;
        }
        if let Ok(dir) = env::var("ISOVIEW_VIEWS_DIR") {
            self.views.dir = PathBuf::from(dir);
        }
        if let Ok(id) = env::var("ISOVIEW_CONTAINER_ID") {
            self.client.container_id = id;
        }
    }
}

/// Parse `16384` or `0x4000`.
#[must_use]
pub fn parse_stack_size(value: &str) -> Option<usize> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn deserialize_stack_size<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(usize),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => parse_stack_size(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid stack size '{}'", s))),
    }
}

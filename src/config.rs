use anyhow::{Context, Result, bail};
use needystates::{AttributeDescriptors, Mapping};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::cli::ConfigFormatArg;

/// Supported state file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Preferred file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    /// Detect the format from a file's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => bail!(
                "Unsupported file type for {} (expected .json, .toml, .yaml or .yml)",
                path.display()
            ),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Serialize `value` in this format
    ///
    /// JSON and YAML keep mapping key order. TOML writes every scalar and
    /// array of a table before its subtables, so keys may move.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

impl From<ConfigFormatArg> for ConfigFormat {
    fn from(arg: ConfigFormatArg) -> Self {
        match arg {
            ConfigFormatArg::Json => Self::Json,
            ConfigFormatArg::Toml => Self::Toml,
            ConfigFormatArg::Yaml => Self::Yaml,
        }
    }
}

/// Load a file in any supported format, returning the detected format too
fn load_with_format<T: DeserializeOwned>(path: &Path) -> Result<(T, ConfigFormat)> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let value = format
        .parse(&content)
        .with_context(|| format!("Invalid {} in {}", format.extension(), path.display()))?;
    log::debug!("Loaded {} from {}", format.extension(), path.display());
    Ok((value, format))
}

/// Load a state file; the document root must be a mapping
pub fn load_state(path: &Path) -> Result<(Mapping, ConfigFormat)> {
    load_with_format(path)
}

/// Load an attribute description table (attribute -> operation -> template)
pub fn load_descriptors(path: &Path) -> Result<AttributeDescriptors> {
    load_with_format(path).map(|(descriptors, _)| descriptors)
}

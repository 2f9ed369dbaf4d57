//! Argument schemas and default overlays read from toml, yaml or json files.

mod defaults;
pub mod errors;
mod schema;

pub use defaults::Defaults;
pub use errors::ConfigError;
pub use schema::{ArgumentDecl, SchemaFile, ValidateDecl};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads `path` and deserializes it according to its extension.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::FileError(format!("failed to open file {}: {e}", path.display())))?;
    tracing::debug!(file = %path.display(), ?format, "loading configuration file");
    parse(&text, format).map_err(|reason| ConfigError::Parse {
        file: path.display().to_string(),
        reason,
    })
}

/// Deserializes `text` written in `format`.
pub fn parse<T: DeserializeOwned>(text: &str, format: Format) -> Result<T, String> {
    match format {
        Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
    }
}

//! Format detection and parsing of configuration documents.
//!
//! The format is selected purely by file extension: `.json`, `.yaml`/`.yml`,
//! or `.toml`. JSON documents additionally run the aggregate schema pass
//! before any section is constructed, mirroring the stricter treatment the
//! canonical format receives; YAML and TOML rely on the per-section checks
//! performed during resolution.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::partial::PartialConfig;
use crate::schema;

/// Parses a configuration document into its raw, partial form.
///
/// Fails with [`ConfigError::FileNotFound`] when the path does not exist and
/// with [`ConfigError::FormatNotSupported`] when the extension is
/// unrecognised or the document violates the schema. Pure parse: no side
/// effects beyond reading the file.
pub fn load_document(path: &Path) -> Result<PartialConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    match extension {
        "json" => parse_json(&contents),
        "yaml" | "yml" => parse_yaml(&contents),
        "toml" => parse_toml(&contents),
        other => Err(ConfigError::unsupported(format!(
            "the configuration file format '{other}' is not supported"
        ))),
    }
}

fn parse_json(contents: &str) -> Result<PartialConfig, ConfigError> {
    let partial: PartialConfig = serde_json::from_str(contents)
        .map_err(|error| ConfigError::unsupported(error.to_string()))?;
    let violations = schema::violations(&partial);
    if violations.is_empty() {
        Ok(partial)
    } else {
        Err(ConfigError::unsupported(violations.join("; ")))
    }
}

fn parse_yaml(contents: &str) -> Result<PartialConfig, ConfigError> {
    // An empty YAML document is a valid, fully-defaulted configuration.
    if contents.trim().is_empty() {
        return Ok(PartialConfig::default());
    }
    serde_yaml::from_str(contents).map_err(|error| ConfigError::unsupported(error.to_string()))
}

fn parse_toml(contents: &str) -> Result<PartialConfig, ConfigError> {
    toml::from_str(contents).map_err(|error| ConfigError::unsupported(error.to_string()))
}

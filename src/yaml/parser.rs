//! Typed YAML loading for catalogs and configuration

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Deserialize YAML content; `filename` labels any error
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|err| YamlSyntaxError::from_serde_error(&err, content, filename).into())
}

/// Read and deserialize a YAML file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "loading YAML");
    parse_yaml(&content, &path.display().to_string())
}

//! Diagnostics for YAML catalogs and configuration files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors from reading or parsing YAML input
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read YAML: {0}")]
    #[diagnostic(code(relpred::yaml::io))]
    Io(#[from] std::io::Error),
}

/// A syntax or shape error with the offending location highlighted
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(code(relpred::yaml::syntax))]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,
    pub line: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build from a serde error, pointing at the reported location if any
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let location = err.location();
        let span = location
            .as_ref()
            .map(|loc| SourceSpan::from((loc.index().min(content.len()), 1)));

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line: location.map(|loc| loc.line()),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_records_line() {
        let content = "method: method_i\nconfidence_level: [oops\n";
        let err = serde_yml::from_str::<serde_yml::Value>(content).unwrap_err();
        let syntax = YamlSyntaxError::from_serde_error(&err, content, "config.yaml");

        assert_eq!(syntax.filename, "config.yaml");
        assert!(syntax.line.is_some());
        assert!(syntax.to_string().starts_with("Invalid YAML in config.yaml"));
    }
}

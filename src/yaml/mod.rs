//! YAML input - catalogs and engine configuration
//!
//! Both loaders go through [`parse_yaml`] so that every syntax or shape error
//! carries the file name and, when serde reports one, the offending location.

pub mod diagnostics;
pub mod parser;

pub use diagnostics::{YamlError, YamlSyntaxError};
pub use parser::{parse_yaml, parse_yaml_file};

use super::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config '{field}' must be >= 1: {source}")]
    FieldMustBePositive {
        field: String,
        #[source]
        source: ValidationError,
    },
    #[error("Invalid config duration: {source}")]
    InvalidDuration {
        #[source]
        source: ValidationError,
    },
    #[error("Missing request spec (set --req-spec or provide req_spec in config).")]
    MissingRequestSpec,
    #[error("Invalid request spec '{path}'. Expected a .json file.")]
    RequestSpecExtension { path: PathBuf },
    #[error("Failed to read request spec '{path}': {source}")]
    ReadRequestSpec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse request spec '{path}': {source}")]
    ParseRequestSpec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No usable requests after validation (total: {total}, valid: 0).")]
    EmptyTemplateSet { total: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

use std::path::Path;

use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::{RawRequest, TemplateSet};
use super::validate::{ValidationReport, validate_requests};

/// Reads a JSON request spec: an array of `{verb, url, headers, body}` records.
///
/// # Errors
///
/// Returns a configuration error when the path is not a `.json` file, cannot
/// be read, or does not decode as an array of request records.
pub fn load_request_spec(path: &Path) -> AppResult<Vec<RawRequest>> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return Err(AppError::config(ConfigError::RequestSpecExtension {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadRequestSpec {
            path: path.to_path_buf(),
            source: err,
        })
    })?;

    let requests: Vec<RawRequest> = serde_json::from_str(&content).map_err(|err| {
        AppError::config(ConfigError::ParseRequestSpec {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    debug!("Loaded {} request(s) from {}", requests.len(), path.display());
    Ok(requests)
}

/// Loads and validates a request spec in one step.
///
/// # Errors
///
/// Returns a configuration error when the request spec cannot be loaded or when no
/// request survives validation.
pub fn load_template_set(path: &Path) -> AppResult<(TemplateSet, ValidationReport)> {
    let raw = load_request_spec(path)?;
    let (templates, report) = validate_requests(raw);
    if templates.is_empty() {
        return Err(AppError::config(ConfigError::EmptyTemplateSet {
            total: report.total,
        }));
    }
    Ok((TemplateSet::new(templates)?, report))
}

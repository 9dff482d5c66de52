use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration;
use crate::error::ValidationError;

/// Keys accepted in `blitz.toml` / `blitz.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "request_spec")]
    pub req_spec: Option<String>,
    pub duration: Option<DurationValue>,
    pub num_clients: Option<usize>,
    pub metrics_endpoint: Option<String>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

impl ConfigFile {
    /// File names looked up, in order, when `--config` is absent.
    pub const DEFAULT_NAMES: [&'static str; 2] = ["blitz.toml", "blitz.json"];
}

/// A duration given either as whole seconds or as text such as `"90s"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, ConfigError, ValidationError};

/// The verbs a template may use. Anything else is dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Only POST and PUT send the serialized body.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put)
    }

    #[must_use]
    pub fn to_method(self) -> reqwest::Method {
        match self {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Post => reqwest::Method::POST,
            HttpVerb::Put => reqwest::Method::PUT,
            HttpVerb::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpVerb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpVerb::Get),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "DELETE" => Ok(HttpVerb::Delete),
            _ => Err(ValidationError::UnsupportedVerb { verb: s.to_owned() }),
        }
    }
}

/// One record of the request spec file, before validation.
///
/// Missing fields decode to their zero values so a single incomplete record is
/// rejected during validation instead of failing the whole file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawRequest {
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    pub verb: HttpVerb,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded body, serialized once at validation time.
    pub body: Option<Bytes>,
}

/// Validated, non-empty pool of templates shared read-only by every client.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: Arc<[RequestTemplate]>,
}

impl TemplateSet {
    /// Wraps validated templates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyTemplateSet` when no template survived
    /// validation; a run never starts with an empty pool.
    pub fn new(templates: Vec<RequestTemplate>) -> Result<Self, AppError> {
        if templates.is_empty() {
            return Err(AppError::config(ConfigError::EmptyTemplateSet { total: 0 }));
        }
        Ok(Self {
            templates: templates.into(),
        })
    }

    /// Picks a template uniformly at random.
    pub fn choose<R>(&self, rng: &mut R) -> Option<&RequestTemplate>
    where
        R: Rng + ?Sized,
    {
        self.templates.choose(rng)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestTemplate> {
        self.templates.iter()
    }
}

use reqwest::{Client, Request};

use crate::spec::RequestTemplate;

/// Turns a template into a native request. The body is attached for POST
/// and PUT only.
///
/// # Errors
///
/// Returns the builder error for an unparsable URL or an invalid header.
pub fn build_request(client: &Client, template: &RequestTemplate) -> Result<Request, reqwest::Error> {
    let mut builder = client.request(template.verb.to_method(), template.url.as_str());
    for (key, value) in &template.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    if template.verb.carries_body()
        && let Some(body) = template.body.as_ref()
    {
        builder = builder.body(body.clone());
    }
    builder.build()
}

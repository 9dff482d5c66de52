//! Request templates: loading, validation, and the shared template set.
mod loader;
mod types;
mod validate;


pub use loader::{load_request_spec, load_template_set};
pub use types::{HttpVerb, RawRequest, RequestTemplate, TemplateSet};
pub use validate::{Rejection, RejectionReason, ValidationReport, validate_requests};

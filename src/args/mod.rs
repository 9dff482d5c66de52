//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::BlitzArgs;
pub use types::PositiveUsize;

pub(crate) use parsers::parse_duration;

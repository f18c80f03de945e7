//! Courier domain core.
//!
//! Pure, I/O-free building blocks of the request execution pipeline:
//!
//! - [`interpolate`]: `{{name}}` template substitution.
//! - [`request`]: draft requests and the request normalizer.
//! - [`outcome`]: the result of a single relay dispatch.
//! - [`variables`]: flattening stored environment variables.
//! - [`validation`]: input rules for environments and collections.

pub mod error;
pub mod interpolate;
pub mod outcome;
pub mod request;
pub mod types;
pub mod validation;
pub mod variables;

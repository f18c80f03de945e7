//! Relay dispatcher.
//!
//! Performs the outbound HTTP call for a [`NormalizedRequest`] and turns
//! whatever happens into an [`Outcome`]:
//!
//! - every HTTP status, 4xx/5xx included, is a normal outcome;
//! - no response at all (DNS, refused connection, timeout) is an outcome
//!   with status `0` and a diagnostic payload;
//! - only a request that cannot even be built is a [`RelayError`].
//!
//! [`NormalizedRequest`]: courier_core::request::NormalizedRequest
//! [`Outcome`]: courier_core::outcome::Outcome

pub mod config;
pub mod dispatcher;
pub mod error;

pub use config::RelayConfig;
pub use dispatcher::{Dispatch, HttpDispatcher};
pub use error::RelayError;

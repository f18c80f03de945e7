//! Request handlers.
//!
//! Handlers extract the owner and payload, delegate to the engine and map
//! errors via [`AppError`](crate::error::AppError).

pub mod collections;
pub mod environments;
pub mod history;
pub mod proxy;

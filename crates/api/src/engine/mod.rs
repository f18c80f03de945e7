//! Request execution engine.
//!
//! - [`pipeline`]: interpolate, normalize, dispatch and record one request.
//! - [`environment`]: resolve the active variable set and manage
//!   environments.
//! - [`collections`]: create collections and save request snapshots.

pub mod collections;
pub mod environment;
pub mod pipeline;

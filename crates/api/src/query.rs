//! Shared query parameter types for API handlers.

use courier_core::types::OwnerId;
use serde::Deserialize;

/// Owner identifier passed as `?userId=`.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl OwnerParams {
    /// The owner, if a non-blank `userId` was given.
    pub fn owner(&self) -> Option<OwnerId> {
        OwnerId::parse(self.user_id.as_deref())
    }
}

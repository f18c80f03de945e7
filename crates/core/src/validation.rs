//! Input rules for environments, collections and collection items.

use crate::error::CoreError;
use crate::request::HttpMethod;
use crate::types::{EntityId, OwnerId};

/// Maximum length for environment, collection and item names.
pub const MAX_NAME_LEN: usize = 200;

/// Require an owner for a mutating operation.
pub fn require_owner(owner: Option<OwnerId>) -> Result<OwnerId, CoreError> {
    owner.ok_or(CoreError::MissingField("userId"))
}

/// Validate a display name: non-blank and within length limit.
///
/// Returns the trimmed name.
pub fn validate_name(name: Option<&str>) -> Result<String, CoreError> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::MissingField("name"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name too long: {} chars (max {MAX_NAME_LEN})",
            trimmed.chars().count()
        )));
    }
    Ok(trimmed.to_string())
}

/// Require a selected collection for saving an item.
pub fn require_collection(collection_id: Option<EntityId>) -> Result<EntityId, CoreError> {
    collection_id.ok_or(CoreError::MissingField("collectionId"))
}

/// Parse the method of a saved item, defaulting to `GET` when absent.
pub fn item_method(raw: Option<&str>) -> Result<HttpMethod, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(HttpMethod::Get),
        Some(m) => m.parse(),
    }
}

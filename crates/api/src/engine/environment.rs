//! Environment Resolver and environment management.
//!
//! The active environment is always an explicit argument: handlers resolve
//! it here and hand the variable mapping to the pipeline.

use serde_json::Value;

use courier_core::types::{EntityId, OwnerId};
use courier_core::validation::{require_owner, validate_name};
use courier_core::variables::{self, Variables};
use courier_db::models::environment::{Environment, UpsertEnvironment};
use courier_db::{EnvironmentStore, StoreResult};

use crate::error::AppResult;

/// The variable mapping of the owner's environment `environment_id`.
///
/// Empty when no owner or environment is given, when the environment does
/// not exist for this owner, or when its stored variables are not an
/// object. Store failures are returned.
pub async fn resolve<S>(
    store: &S,
    owner: Option<&OwnerId>,
    environment_id: Option<EntityId>,
) -> StoreResult<Variables>
where
    S: EnvironmentStore + ?Sized,
{
    let (Some(owner), Some(id)) = (owner, environment_id) else {
        return Ok(Variables::new());
    };

    let Some(environment) = store.get_environment(owner, id).await? else {
        tracing::debug!(owner_id = %owner, environment_id = %id, "Environment not found, using no variables");
        return Ok(Variables::new());
    };

    match variables::flatten(&environment.variables) {
        Some(vars) => Ok(vars),
        None => {
            tracing::warn!(
                owner_id = %owner,
                environment_id = %id,
                "Stored environment variables are not an object, using no variables"
            );
            Ok(Variables::new())
        }
    }
}

/// The owner's environments, oldest first. No owner, no environments.
pub async fn list<S>(store: &S, owner: Option<&OwnerId>) -> StoreResult<Vec<Environment>>
where
    S: EnvironmentStore + ?Sized,
{
    match owner {
        Some(owner) => store.list_environments(owner).await,
        None => Ok(Vec::new()),
    }
}

/// Create or replace an environment.
///
/// Missing `variables` means an empty set.
pub async fn upsert<S>(
    store: &S,
    owner: Option<OwnerId>,
    id: Option<EntityId>,
    name: Option<&str>,
    variables: Option<Value>,
) -> AppResult<Environment>
where
    S: EnvironmentStore + ?Sized,
{
    let owner = require_owner(owner)?;
    let name = validate_name(name)?;
    let variables = match variables {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };
    variables::validate(&variables)?;

    let input = UpsertEnvironment {
        id,
        name,
        variables,
    };
    let saved = store.upsert_environment(&owner, &input).await?;
    tracing::info!(owner_id = %owner, id = %saved.id, name = %saved.name, "Environment saved");
    Ok(saved)
}

/// Delete an environment. Unknown ids are not an error.
pub async fn delete<S>(store: &S, owner: Option<OwnerId>, id: EntityId) -> AppResult<()>
where
    S: EnvironmentStore + ?Sized,
{
    let owner = require_owner(owner)?;
    let removed = store.delete_environment(&owner, id).await?;
    tracing::info!(owner_id = %owner, %id, removed, "Environment deleted");
    Ok(())
}

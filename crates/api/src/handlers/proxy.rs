//! Handlers for relaying requests.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use courier_core::outcome::Outcome;
use courier_core::request::{normalize_parts, DraftRequest};
use courier_core::types::{EntityId, OwnerId};

use crate::engine::environment;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// Body of `POST /proxy`: an already-parsed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyPayload {
    pub method: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
    pub user_id: Option<String>,
}

/// Body of `POST /send`: a draft with raw header and body text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPayload {
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<String>,
    pub body: Option<String>,
    pub environment_id: Option<String>,
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /proxy
// ---------------------------------------------------------------------------

/// Relay a request and return the remote outcome.
///
/// Remote 4xx/5xx and unreachable hosts are still HTTP 200 here.
pub async fn proxy(
    State(state): State<AppState>,
    AppJson(input): AppJson<ProxyPayload>,
) -> AppResult<Json<Outcome>> {
    let owner = OwnerId::parse(input.user_id.as_deref());
    let request = normalize_parts(
        input.method.as_deref(),
        input.url.as_deref(),
        input.headers.as_ref(),
        input.body,
    )?;

    let outcome = state.pipeline.relay(&request, owner.as_ref()).await?;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// POST /send
// ---------------------------------------------------------------------------

/// Resolve the environment, interpolate the draft and relay it.
pub async fn send(
    State(state): State<AppState>,
    AppJson(input): AppJson<SendPayload>,
) -> AppResult<Json<Outcome>> {
    let owner = OwnerId::parse(input.user_id.as_deref());
    let environment_id = parse_environment_id(input.environment_id.as_deref());
    let variables = environment::resolve(state.store.as_ref(), owner.as_ref(), environment_id).await?;

    let draft = DraftRequest {
        method: input.method.unwrap_or_default(),
        url: input.url.unwrap_or_default(),
        headers: input.headers.unwrap_or_default(),
        body: input.body.unwrap_or_default(),
    };

    let outcome = state
        .pipeline
        .send(&draft, &variables, owner.as_ref())
        .await?;
    Ok(Json(outcome))
}

/// An unparsable id selects no environment.
fn parse_environment_id(raw: Option<&str>) -> Option<EntityId> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::debug!(environment_id = raw, "Ignoring malformed environment id");
            None
        }
    }
}

//! The request execution pipeline.
//!
//! Interpolation and normalization run synchronously; the dispatch is the
//! only await point on the request path. History is enqueued after the
//! outcome exists and never changes it.

use std::sync::Arc;

use serde_json::Value;

use courier_core::interpolate::unresolved_keys;
use courier_core::outcome::Outcome;
use courier_core::request::{normalize, DraftRequest, NormalizedRequest};
use courier_core::types::OwnerId;
use courier_core::variables::Variables;
use courier_history::HistoryRecorder;
use courier_relay::Dispatch;

use crate::error::AppResult;

pub struct RelayPipeline {
    dispatcher: Arc<dyn Dispatch>,
    recorder: HistoryRecorder,
}

impl RelayPipeline {
    pub fn new(dispatcher: Arc<dyn Dispatch>, recorder: HistoryRecorder) -> Self {
        Self {
            dispatcher,
            recorder,
        }
    }

    /// Execute a draft against `variables`.
    ///
    /// History keeps the interpolated URL and the interpolated raw header
    /// and body text. A validation failure returns before any dispatch.
    pub async fn send(
        &self,
        draft: &DraftRequest,
        variables: &Variables,
        owner: Option<&OwnerId>,
    ) -> AppResult<Outcome> {
        let resolved = draft.interpolated(variables);

        let unresolved = unresolved_keys(&resolved.url, variables);
        if !unresolved.is_empty() {
            tracing::debug!(keys = ?unresolved, url = %resolved.url, "URL keeps unresolved tokens");
        }

        let request = normalize(&resolved)?;
        self.dispatch_and_record(&request, &resolved.headers, &resolved.body, owner)
            .await
    }

    /// Relay an already-parsed request.
    ///
    /// History keeps the JSON text of the header map and body.
    pub async fn relay(
        &self,
        request: &NormalizedRequest,
        owner: Option<&OwnerId>,
    ) -> AppResult<Outcome> {
        let headers = serde_json::to_string(&request.headers).unwrap_or_default();
        let body = request
            .body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();
        self.dispatch_and_record(request, &headers, &body, owner)
            .await
    }

    async fn dispatch_and_record(
        &self,
        request: &NormalizedRequest,
        raw_headers: &str,
        raw_body: &str,
        owner: Option<&OwnerId>,
    ) -> AppResult<Outcome> {
        let outcome = self.dispatcher.dispatch(request).await?;

        self.recorder.record(
            owner,
            request.method,
            &request.url,
            raw_headers,
            raw_body,
            outcome.status,
        );

        Ok(outcome)
    }
}

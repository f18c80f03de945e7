//! The result of one relay dispatch.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Status code reported when no response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Why a dispatch produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Other,
}

impl TransportFailure {
    pub fn status_text(&self) -> &'static str {
        match self {
            TransportFailure::Timeout => "Request Timeout",
            TransportFailure::Connect => "Connection Failed",
            TransportFailure::Other => "Transport Error",
        }
    }
}

/// Fully resolved result of a single dispatch attempt.
///
/// Remote 4xx/5xx answers are ordinary outcomes carrying the remote status.
/// `status == 0` means the remote could not be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
    pub elapsed_ms: u64,
}

impl Outcome {
    /// Outcome for a request that never received a response.
    pub fn transport_failure(
        kind: TransportFailure,
        details: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let status_text = kind.status_text();
        Self {
            status: TRANSPORT_FAILURE_STATUS,
            status_text: status_text.to_string(),
            headers: BTreeMap::new(),
            data: json!({
                "error": status_text,
                "details": details.into(),
            }),
            elapsed_ms: millis(elapsed),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE_STATUS
    }
}

/// Convert a duration to whole milliseconds, saturating.
pub fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Interpret a response body: JSON when it parses, a JSON string otherwise.
pub fn body_to_data(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

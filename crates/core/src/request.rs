//! Draft requests and the request normalizer.
//!
//! A [`DraftRequest`] is what the user composed: method and URL plus raw,
//! unparsed header and body text. [`normalize`] validates a draft (after
//! interpolation) into a [`NormalizedRequest`] that the relay can send.
//! Any failure here is terminal: nothing is dispatched.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::interpolate::interpolate;
use crate::variables::Variables;

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// HTTP methods the relay accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidMethod(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Draft and normalized requests
// ---------------------------------------------------------------------------

/// A user-composed request, not yet interpolated or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub method: String,
    pub url: String,
    /// Raw header text, expected to be a JSON object once interpolated.
    #[serde(default)]
    pub headers: String,
    /// Raw body text, expected to be JSON once interpolated.
    #[serde(default)]
    pub body: String,
}

impl DraftRequest {
    /// Apply the interpolator to the URL, header text and body text.
    pub fn interpolated(&self, variables: &Variables) -> DraftRequest {
        DraftRequest {
            method: self.method.clone(),
            url: interpolate(&self.url, variables).into_owned(),
            headers: interpolate(&self.headers, variables).into_owned(),
            body: interpolate(&self.body, variables).into_owned(),
        }
    }
}

/// Header map sent to the remote origin.
pub type HeaderMap = BTreeMap<String, String>;

/// A validated request ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Validate an interpolated draft into a [`NormalizedRequest`].
///
/// - `method` and `url` are mandatory ([`CoreError::MissingField`]).
/// - Non-blank body text must parse as JSON.
/// - Non-blank header text must parse as a JSON object.
///
/// Blank header text yields an empty header map and blank body text yields
/// no body.
pub fn normalize(draft: &DraftRequest) -> Result<NormalizedRequest, CoreError> {
    let method = require_method(Some(&draft.method))?;
    let url = require_url(Some(&draft.url))?;

    let body = match draft.body.trim() {
        "" => None,
        text => {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| CoreError::invalid_payload("body", e.to_string()))?;
            non_null(value)
        }
    };

    let headers = match draft.headers.trim() {
        "" => HeaderMap::new(),
        text => {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| CoreError::invalid_payload("headers", e.to_string()))?;
            header_map(&value)?
        }
    };

    Ok(NormalizedRequest {
        method,
        url,
        headers,
        body,
    })
}

/// Build a [`NormalizedRequest`] from already-parsed parts, as received by
/// the relay endpoint.
///
/// `headers` may be absent or `null` (empty map) or a JSON object. A `null`
/// body is treated as no body.
pub fn normalize_parts(
    method: Option<&str>,
    url: Option<&str>,
    headers: Option<&Value>,
    body: Option<Value>,
) -> Result<NormalizedRequest, CoreError> {
    let method = require_method(method)?;
    let url = require_url(url)?;
    let headers = match headers {
        None | Some(Value::Null) => HeaderMap::new(),
        Some(value) => header_map(value)?,
    };

    Ok(NormalizedRequest {
        method,
        url,
        headers,
        body: body.and_then(non_null),
    })
}

fn require_method(raw: Option<&str>) -> Result<HttpMethod, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Err(CoreError::MissingField("method")),
        Some(m) => m.parse(),
    }
}

fn require_url(raw: Option<&str>) -> Result<String, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Err(CoreError::MissingField("url")),
        Some(u) => Ok(u.to_string()),
    }
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

/// Convert a JSON object into a header map.
///
/// String values are used as-is, numbers and booleans are stringified and
/// nulls are dropped. Arrays, nested objects and non-object inputs are
/// rejected.
pub fn header_map(value: &Value) -> Result<HeaderMap, CoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::invalid_payload("headers", "expected a JSON object"))?;

    let mut headers = HeaderMap::new();
    for (name, v) in object {
        let text = match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(CoreError::invalid_payload(
                    "headers",
                    format!("header '{name}' must be a scalar value"),
                ))
            }
        };
        headers.insert(name.clone(), text);
    }
    Ok(headers)
}

//! Outbound HTTP dispatch.
//!
//! [`Dispatch`] is the seam the execution pipeline calls through;
//! [`HttpDispatcher`] is the reqwest implementation. The target URL is used
//! exactly as given: no rewriting, no scheme or host filtering.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

use courier_core::outcome::{body_to_data, millis, Outcome, TransportFailure};
use courier_core::request::{HttpMethod, NormalizedRequest};

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Executes a normalized request and reports its outcome.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Send `request` and wait for the complete response.
    ///
    /// Returns `Err` only when the request cannot be constructed; once it is
    /// sent the result is always an [`Outcome`].
    async fn dispatch(&self, request: &NormalizedRequest) -> Result<Outcome, RelayError>;
}

/// reqwest-backed [`Dispatch`] sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
}

impl HttpDispatcher {
    /// Build a dispatcher from relay configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let redirect = match config.max_redirects {
            0 => Policy::none(),
            n => Policy::limited(n),
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Translate a normalized request into a reqwest request without
    /// sending it.
    fn build(&self, request: &NormalizedRequest) -> Result<reqwest::Request, RelayError> {
        let url = Url::parse(&request.url)
            .map_err(|e| RelayError::InvalidRequest(format!("invalid URL '{}': {e}", request.url)))?;

        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RelayError::InvalidRequest(format!("invalid header name '{name}': {e}")))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                RelayError::InvalidRequest(format!("invalid value for header '{name}': {e}"))
            })?;
            headers.append(header_name, header_value);
        }

        let mut builder = self.client.request(to_reqwest_method(request.method), url);

        match &request.body {
            None => {}
            Some(Value::String(text)) => {
                builder = builder.body(text.clone());
            }
            Some(value) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| RelayError::InvalidRequest(format!("unserializable body: {e}")))?;
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                builder = builder.body(bytes);
            }
        }

        builder
            .headers(headers)
            .build()
            .map_err(|e| RelayError::InvalidRequest(error_chain(&e)))
    }

    /// Send the request and read the full body.
    async fn execute(
        &self,
        outbound: reqwest::Request,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>), reqwest::Error> {
        let response = self.client.execute(outbound).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok((status, headers, body.to_vec()))
    }
}

#[async_trait]
impl Dispatch for HttpDispatcher {
    async fn dispatch(&self, request: &NormalizedRequest) -> Result<Outcome, RelayError> {
        let outbound = self.build(request)?;

        let started = Instant::now();
        let result = self.execute(outbound).await;
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok((status, headers, body)) => Outcome {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers: flatten_headers(&headers),
                data: body_to_data(&body),
                elapsed_ms: millis(elapsed),
            },
            Err(e) => {
                let kind = classify(&e);
                let details = error_chain(&e);
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    kind = kind.status_text(),
                    error = %details,
                    "Relay could not reach remote"
                );
                Outcome::transport_failure(kind, details, elapsed)
            }
        };

        tracing::info!(
            method = %request.method,
            url = %request.url,
            status = outcome.status,
            elapsed_ms = outcome.elapsed_ms,
            "Relayed request"
        );
        Ok(outcome)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

fn classify(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect
    } else {
        TransportFailure::Other
    }
}

/// Render an error with its full source chain.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Collapse response headers into one entry per name, joining repeats
/// with `", "`.
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let text = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&text);
            })
            .or_insert_with(|| text.into_owned());
    }
    flat
}

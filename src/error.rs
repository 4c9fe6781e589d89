use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::model::Others;

/// `__type` values CKAN uses to report a missing object.
const NOT_FOUND_MARKERS: &[&str] = &["Not Found Error", "Not Found"];

pub type Result<T, E = CkanError> = std::result::Result<T, E>;

/// Every failure a catalog call can produce.
#[derive(Debug, Error)]
pub enum CkanError {
    /// A write was rejected locally, before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The body was not a CKAN envelope, or its result had the wrong shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The catalog reported that the requested object does not exist.
    #[error(transparent)]
    NotFound(RemoteError),
    /// Any other `success: false` reply.
    #[error(transparent)]
    Remote(RemoteError),
    /// No reply was received (connection, TLS, timeout).
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl CkanError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CkanError::NotFound(_))
    }

    /// The remote failure, for both [`CkanError::NotFound`] and
    /// [`CkanError::Remote`].
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            CkanError::NotFound(e) | CkanError::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// The endpoint involved, when a request was attempted.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            CkanError::NotFound(e) | CkanError::Remote(e) => Some(&e.context.endpoint),
            CkanError::Decode(e) => e.context.as_ref().map(|c| c.endpoint.as_str()),
            CkanError::Transport { endpoint, .. } => Some(endpoint),
            CkanError::Validation(_) | CkanError::Config(_) => None,
        }
    }
}

/// What was being called, and by which client, when a failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Full request URL including the query string.
    pub endpoint: String,
    /// Client configuration with the token redacted.
    pub client: String,
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.endpoint, self.client)
    }
}

/// The `error` object of a failed CKAN reply.
///
/// Validation failures put per-field messages next to `__type`, i.e.
/// `{"__type": "Validation Error", "name": ["That URL is already in use."]}`;
/// those end up in `others`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, rename = "__type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub others: Others,
}

impl ErrorDetail {
    pub fn is_not_found(&self) -> bool {
        self.kind.as_deref().is_some_and(|kind| {
            NOT_FOUND_MARKERS
                .iter()
                .any(|m| kind.trim().eq_ignore_ascii_case(m))
        })
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.as_deref().unwrap_or("Unknown Error");
        write!(f, "{kind}")?;
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            write!(f, ": {message}")?;
        }
        for (field, value) in &self.others {
            match value {
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect::<Vec<_>>()
                        .join("; ");
                    write!(f, "\n  {field}: {joined}")?;
                }
                Value::String(s) => write!(f, "\n  {field}: {s}")?,
                other => write!(f, "\n  {field}: {other}")?,
            }
        }
        Ok(())
    }
}

/// A `success: false` reply.
#[derive(Debug, Clone, Error)]
#[error("CKAN call {} failed (HTTP {status}): {detail}{}\nclient: {}", .context.endpoint, remediation(.detail), .context.client)]
pub struct RemoteError {
    pub status: u16,
    pub detail: ErrorDetail,
    /// The envelope's `help` text, usually the action's documentation URL.
    pub help: Option<String>,
    pub context: RequestContext,
}

fn remediation(detail: &ErrorDetail) -> &'static str {
    match detail.kind.as_deref() {
        Some("Authorization Error") => {
            "\n\nHow to fix:\n- Check that the API token is set and valid for this catalog\n- Ensure the token's user has rights on the target dataset or organization"
        }
        _ => "",
    }
}

/// A reply that could not be understood.
#[derive(Debug, Error)]
#[error("could not decode CKAN response{}: {reason}{}", fmt_origin(.status, .context), base_url_hint(.status))]
pub struct DecodeError {
    pub status: Option<u16>,
    pub reason: String,
    /// The raw body as received.
    pub body: String,
    pub context: Option<RequestContext>,
    #[source]
    pub source: Option<serde_json::Error>,
}

impl DecodeError {
    pub(crate) fn new(
        status: u16,
        body: &str,
        context: &RequestContext,
        reason: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Self {
            status: Some(status),
            reason: reason.into(),
            body: body.to_string(),
            context: Some(context.clone()),
            source,
        }
    }

    /// A decode failure outside any HTTP exchange.
    pub(crate) fn detached(body: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            status: None,
            reason: source.to_string(),
            body: body.into(),
            context: None,
            source: Some(source),
        }
    }
}

fn fmt_origin(status: &Option<u16>, context: &Option<RequestContext>) -> String {
    match (status, context) {
        (Some(status), Some(ctx)) => format!(" from {} (HTTP {status})", ctx.endpoint),
        (None, Some(ctx)) => format!(" from {}", ctx.endpoint),
        (Some(status), None) => format!(" (HTTP {status})"),
        (None, None) => String::new(),
    }
}

fn base_url_hint(status: &Option<u16>) -> &'static str {
    // A non-envelope 404 almost always means the base URL points below the
    // catalog root.
    if *status == Some(404) {
        "\n- The configured url should be the catalog root, i.e. https://demo.ckan.org, without /api/3"
    } else {
        ""
    }
}

/// A write refused by [`CheckedClient`](crate::CheckedClient).
#[derive(Debug, Clone, Error)]
#[error("validation failed: {message}\nclient: {client}")]
pub struct ValidationError {
    pub message: String,
    pub client: String,
}

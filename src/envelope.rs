use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{CkanError, DecodeError, ErrorDetail, RemoteError, RequestContext, Result};
use crate::model::Nullable;

/// The wrapper around every Action API reply:
/// `{"help": ..., "success": ..., "result": ..., "error": ...}`.
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    help: Option<String>,
    #[serde(default)]
    result: Nullable<Value>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

/// Turns a raw reply into the requested result or a classified failure.
///
/// This is the only place that decides between not-found, remote and decode
/// failures. The HTTP status is recorded but never used for classification.
pub(crate) fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    context: &RequestContext,
) -> Result<T> {
    let status = status.as_u16();

    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        DecodeError::new(
            status,
            body,
            context,
            format!("body is not a CKAN envelope: {e}"),
            Some(e),
        )
    })?;

    if !envelope.success {
        let Some(detail) = envelope.error else {
            return Err(DecodeError::new(
                status,
                body,
                context,
                "reply has success=false but no error",
                None,
            )
            .into());
        };

        let remote = RemoteError {
            status,
            detail,
            help: envelope.help,
            context: context.clone(),
        };
        if remote.detail.is_not_found() {
            debug!(endpoint = %context.endpoint, "catalog reported not found");
            return Err(CkanError::NotFound(remote));
        }
        return Err(CkanError::Remote(remote));
    }

    let result = match envelope.result {
        Nullable::Present(v) => v,
        Nullable::Null => Value::Null,
        Nullable::Absent => {
            return Err(DecodeError::new(
                status,
                body,
                context,
                "reply has success=true but no result",
                None,
            )
            .into());
        }
    };

    serde_json::from_value(result).map_err(|e| {
        DecodeError::new(
            status,
            body,
            context,
            format!("unexpected result shape: {e}"),
            Some(e),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Dataset;

    fn ctx() -> RequestContext {
        RequestContext {
            endpoint: "http://ckan.test/api/3/action/package_show?id=666".into(),
            client: "url=http://ckan.test, token=<none>, proxy=<none>".into(),
        }
    }

    #[test]
    fn list_result() {
        let names: Vec<String> = decode(
            StatusCode::OK,
            r#"{"help":"bla bla", "success":true, "result":["a","b"]}"#,
            &ctx(),
        )
        .unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn not_found_is_classified() {
        let err = decode::<Dataset>(
            StatusCode::NOT_FOUND,
            r#"{"success":false,"error":{"__type":"Not Found Error","message":"Not found"},"help":"x"}"#,
            &ctx(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
        let remote = err.remote().unwrap();
        assert_eq!(remote.help.as_deref(), Some("x"));
        assert_eq!(remote.context, ctx());
    }

    #[test]
    fn other_failures_are_remote() {
        let err = decode::<Dataset>(
            StatusCode::CONFLICT,
            r#"{"success":false,"error":{"__type":"Validation Error"}}"#,
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, CkanError::Remote(_)));
        assert_eq!(err.remote().unwrap().status, 409);
    }

    #[test]
    fn success_without_result_is_a_decode_error() {
        let err = decode::<Dataset>(StatusCode::OK, r#"{"success":true,"help":"h"}"#, &ctx())
            .unwrap_err();
        let CkanError::Decode(e) = err else {
            panic!("expected decode error, got {err:?}");
        };
        assert_eq!(e.status, Some(200));
        assert_eq!(e.body, r#"{"success":true,"help":"h"}"#);
    }

    #[test]
    fn failure_without_error_is_a_decode_error() {
        let err = decode::<Dataset>(StatusCode::OK, r#"{"success":false}"#, &ctx()).unwrap_err();
        assert!(matches!(err, CkanError::Decode(_)));
    }

    #[test]
    fn html_body_keeps_status_and_payload() {
        let err = decode::<Dataset>(StatusCode::BAD_GATEWAY, "<html>oops</html>", &ctx())
            .unwrap_err();
        let CkanError::Decode(e) = err else {
            panic!("expected decode error, got {err:?}");
        };
        assert_eq!(e.status, Some(502));
        assert_eq!(e.body, "<html>oops</html>");
        assert!(e.source.is_some());
    }

    #[test]
    fn wrong_result_shape_is_a_decode_error() {
        let err = decode::<Vec<String>>(
            StatusCode::OK,
            r#"{"success":true,"result":{"name":"x"}}"#,
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, CkanError::Decode(_)));
    }
}

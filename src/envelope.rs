//! The service's JSON envelope and binary payloads.
//!
//! Most endpoints answer with `{"success": bool, "data": ...}`, but a fair
//! number put their payload in a top-level field instead (`videos`, `info`,
//! `results`, ...). The envelope keeps the payload opaque and leaves field
//! extraction to the endpoint layer.

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Outcome reported by the service inside a 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// `success` was `true` or absent.
    Success {
        /// The `data` field, or the whole body when there is none.
        data: Value,
        /// Remaining top-level fields (e.g. `usage`), without `success` and `data`.
        meta: Map<String, Value>,
    },

    /// `success` was `false`.
    Failure {
        /// The service's `error` code, if it sent one.
        error_code: Option<String>,
        /// Human-readable message.
        message: String,
        /// HTTP status the envelope arrived with.
        http_status: Option<u16>,
    },
}

impl ResponseEnvelope {
    /// Classifies a decoded body.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognima::ResponseEnvelope;
    /// use http::StatusCode;
    /// use serde_json::json;
    ///
    /// let envelope = ResponseEnvelope::from_value(
    ///     json!({"success": true, "data": {"x": 1}}),
    ///     StatusCode::OK,
    /// );
    /// assert_eq!(envelope.data(), Some(&json!({"x": 1})));
    ///
    /// let envelope = ResponseEnvelope::from_value(
    ///     json!({"success": false, "error": "bad_url", "message": "invalid"}),
    ///     StatusCode::OK,
    /// );
    /// assert_eq!(envelope.error_code(), Some("bad_url"));
    /// assert_eq!(envelope.message(), Some("invalid"));
    /// ```
    pub fn from_value(body: Value, status: StatusCode) -> Self {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => {
                return ResponseEnvelope::Success {
                    data: other,
                    meta: Map::new(),
                }
            }
        };

        let success = fields.remove("success");
        if matches!(success, Some(Value::Bool(false))) {
            return failure_from_fields(&fields, status);
        }

        match fields.remove("data") {
            Some(data) => ResponseEnvelope::Success { data, meta: fields },
            None => ResponseEnvelope::Success {
                data: Value::Object(fields),
                meta: Map::new(),
            },
        }
    }

    /// Returns `true` for [`ResponseEnvelope::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    /// The payload of a successful envelope.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success { data, .. } => Some(data),
            ResponseEnvelope::Failure { .. } => None,
        }
    }

    /// A top-level sibling of `data` (such as `usage`) on a successful envelope.
    pub fn meta(&self, field: &str) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success { meta, .. } => meta.get(field),
            ResponseEnvelope::Failure { .. } => None,
        }
    }

    /// The service's error code on a failed envelope.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Failure { error_code, .. } => error_code.as_deref(),
            ResponseEnvelope::Success { .. } => None,
        }
    }

    /// The service's message on a failed envelope.
    pub fn message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Failure { message, .. } => Some(message),
            ResponseEnvelope::Success { .. } => None,
        }
    }

    /// Decodes the payload into `T`, turning a failed envelope into
    /// [`ClientError::Api`].
    ///
    /// `raw_body` is only used to enrich decode errors.
    pub fn into_data<T: DeserializeOwned>(
        self,
        raw_body: &str,
        status: StatusCode,
    ) -> Result<T, ClientError> {
        match self {
            ResponseEnvelope::Success { data, .. } => {
                serde_json::from_value(data).map_err(|e| {
                    tracing::error!(error = %e, "Envelope payload did not match expected shape");
                    ClientError::Decode {
                        raw_response: raw_body.to_string(),
                        serde_error: e.to_string(),
                        status,
                    }
                })
            }
            ResponseEnvelope::Failure {
                error_code,
                message,
                http_status,
            } => Err(ClientError::Api {
                error_code,
                message,
                http_status,
            }),
        }
    }
}

fn failure_from_fields(fields: &Map<String, Value>, status: StatusCode) -> ResponseEnvelope {
    let error = fields.get("error");
    let error_code = match error {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Object(obj)) => obj.get("code").and_then(value_to_string),
        _ => None,
    };

    let message = fields
        .get("message")
        .and_then(value_to_string)
        .or_else(|| match error {
            Some(Value::Object(obj)) => obj.get("message").and_then(value_to_string),
            Some(Value::String(code)) => Some(code.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "request failed".to_string());

    ResponseEnvelope::Failure {
        error_code,
        message,
        http_status: Some(status.as_u16()),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Raw body of a direct file download.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPayload {
    /// The body bytes, unmodified.
    pub bytes: Bytes,
    /// The `Content-Type` header.
    pub content_type: Option<String>,
    /// The `Content-Disposition` header.
    pub content_disposition: Option<String>,
}

impl BinaryPayload {
    /// The file name announced in `Content-Disposition`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognima::BinaryPayload;
    ///
    /// let payload = BinaryPayload {
    ///     bytes: bytes::Bytes::from_static(b"ID3"),
    ///     content_type: Some("audio/mpeg".to_string()),
    ///     content_disposition: Some(r#"attachment; filename="track.mp3""#.to_string()),
    /// };
    /// assert_eq!(payload.filename(), Some("track.mp3"));
    /// ```
    pub fn filename(&self) -> Option<&str> {
        let disposition = self.content_disposition.as_deref()?;
        disposition.split(';').map(str::trim).find_map(|part| {
            let value = part.strip_prefix("filename=")?;
            let value = value.trim_matches('"');
            (!value.is_empty()).then_some(value)
        })
    }

    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the body was empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What a request produced, depending on its [`ResponseKind`](crate::ResponseKind).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A decoded JSON envelope.
    Envelope(ResponseEnvelope),
    /// Raw bytes from a download.
    Binary(BinaryPayload),
}

impl Payload {
    /// The envelope, if this was a JSON response.
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Payload::Envelope(envelope) => Some(envelope),
            Payload::Binary(_) => None,
        }
    }

    /// The bytes, if this was a binary response.
    pub fn binary(&self) -> Option<&BinaryPayload> {
        match self {
            Payload::Binary(payload) => Some(payload),
            Payload::Envelope(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_without_flag() {
        let envelope = ResponseEnvelope::from_value(json!({"data": [1, 2]}), StatusCode::OK);
        assert!(envelope.is_success());
        assert_eq!(envelope.data(), Some(&json!([1, 2])));
    }

    #[test]
    fn success_keeps_siblings_as_meta() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": true, "data": {"model": "m"}, "usage": {"total_tokens": 12}}),
            StatusCode::OK,
        );
        assert_eq!(envelope.data(), Some(&json!({"model": "m"})));
        assert_eq!(envelope.meta("usage"), Some(&json!({"total_tokens": 12})));
        assert_eq!(envelope.meta("success"), None);
    }

    #[test]
    fn top_level_fields_become_data() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": true, "platform": "spotify", "results": []}),
            StatusCode::OK,
        );
        assert_eq!(
            envelope.data(),
            Some(&json!({"platform": "spotify", "results": []}))
        );
    }

    #[test]
    fn non_object_body_is_data() {
        let envelope = ResponseEnvelope::from_value(json!("ok"), StatusCode::OK);
        assert_eq!(envelope.data(), Some(&json!("ok")));
    }

    #[test]
    fn failure_with_code_and_message() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": false, "error": "bad_url", "message": "invalid"}),
            StatusCode::OK,
        );
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure {
                error_code: Some("bad_url".to_string()),
                message: "invalid".to_string(),
                http_status: Some(200),
            }
        );
    }

    #[test]
    fn failure_with_only_error_string() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": false, "error": "Video not found"}),
            StatusCode::OK,
        );
        assert_eq!(envelope.error_code(), Some("Video not found"));
        assert_eq!(envelope.message(), Some("Video not found"));
    }

    #[test]
    fn failure_with_error_object() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": false, "error": {"code": 42, "message": "quota"}}),
            StatusCode::OK,
        );
        assert_eq!(envelope.error_code(), Some("42"));
        assert_eq!(envelope.message(), Some("quota"));
    }

    #[test]
    fn failure_without_details() {
        let envelope = ResponseEnvelope::from_value(json!({"success": false}), StatusCode::OK);
        assert_eq!(envelope.error_code(), None);
        assert_eq!(envelope.message(), Some("request failed"));
    }

    #[test]
    fn into_data_maps_failure_to_api_error() {
        let envelope = ResponseEnvelope::from_value(
            json!({"success": false, "error": "bad_url", "message": "invalid"}),
            StatusCode::OK,
        );
        let err = envelope.into_data::<Value>("", StatusCode::OK).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { ref error_code, .. } if error_code.as_deref() == Some("bad_url")
        ));
    }

    #[test]
    fn into_data_reports_shape_mismatch() {
        let envelope = ResponseEnvelope::from_value(json!({"data": "text"}), StatusCode::OK);
        let err = envelope
            .into_data::<Vec<u32>>(r#"{"data":"text"}"#, StatusCode::OK)
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
        assert_eq!(err.raw_response(), Some(r#"{"data":"text"}"#));
    }

    #[test]
    fn filename_missing() {
        let payload = BinaryPayload {
            bytes: Bytes::new(),
            content_type: None,
            content_disposition: Some("inline".to_string()),
        };
        assert_eq!(payload.filename(), None);
        assert!(payload.is_empty());
    }
}

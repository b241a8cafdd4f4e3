//! Request descriptors.
//!
//! A [`RequestDescriptor`] is everything about one outgoing call: method,
//! path, query parameters, extra headers, optional JSON body and how the
//! response body should be read. It is built fresh for each call.

use crate::error::ClientError;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::time::Duration;

/// How the response body should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// Parse the body as the service's JSON envelope.
    #[default]
    Json,
    /// Return the raw bytes (direct file downloads).
    Binary,
}

/// Description of a single API call.
///
/// # Examples
///
/// ```
/// use cognima::RequestDescriptor;
///
/// let descriptor = RequestDescriptor::get("/spotify/search")
///     .with_query_param("q", "Bohemian Rhapsody")
///     .with_query_param("limit", 5);
///
/// assert_eq!(descriptor.query_params()[1], ("limit".to_string(), "5".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query_params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    response_kind: ResponseKind,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Creates a descriptor for `method` on `path` (relative to the base URL).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            response_kind: ResponseKind::Json,
            timeout: None,
        }
    }

    /// Shorthand for a `GET` descriptor.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a `POST` descriptor.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends a query parameter.
    ///
    /// Strings, numbers and booleans are all accepted and rendered with
    /// `Display`. Keys must be unique; duplicates are reported when the
    /// request is sent, before anything goes over the wire.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Appends a query parameter only when `value` is `Some`.
    pub fn with_optional_query_param<V: Display>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }

    /// Appends several query parameters in order.
    pub fn with_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Display,
    {
        self.query_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Adds a header for this request only.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ClientError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::InvalidParameters(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::InvalidParameters(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets a JSON body that is already a `serde_json::Value`.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` to JSON and sets it as the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] if `body` cannot be represented
    /// as JSON (for example a map with non-string keys).
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ClientError> {
        let value =
            serde_json::to_value(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(self.with_body(value))
    }

    /// Asks for the raw response bytes instead of a JSON envelope.
    pub fn binary(mut self) -> Self {
        self.response_kind = ResponseKind::Binary;
        self
    }

    /// Sets how the response body is read.
    pub fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = kind;
        self
    }

    /// Overrides the client's default timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Extra headers for this request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The JSON body, if any.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// How the response body will be read.
    pub fn response_kind(&self) -> ResponseKind {
        self.response_kind
    }

    /// The timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Checks the descriptor before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] for an empty or repeated
    /// query key.
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut seen = HashSet::with_capacity(self.query_params.len());
        for (key, _) in &self.query_params {
            if key.is_empty() {
                return Err(ClientError::InvalidParameters(
                    "empty query parameter name".to_string(),
                ));
            }
            if !seen.insert(key.as_str()) {
                return Err(ClientError::InvalidParameters(format!(
                    "duplicate query parameter `{}`",
                    key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn coerces_values_to_strings() {
        let descriptor = RequestDescriptor::get("/search")
            .with_query_param("q", "rust")
            .with_query_param("max", 10)
            .with_query_param("redirect", true)
            .with_optional_query_param("days", None::<u32>);

        assert_eq!(
            descriptor.query_params(),
            &[
                ("q".to_string(), "rust".to_string()),
                ("max".to_string(), "10".to_string()),
                ("redirect".to_string(), "true".to_string()),
            ]
        );
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let descriptor = RequestDescriptor::get("/search")
            .with_query_params([("q", "a"), ("max", "1"), ("q", "b")]);

        match descriptor.validate() {
            Err(ClientError::InvalidParameters(msg)) => assert!(msg.contains("`q`")),
            other => panic!("Expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_key() {
        let descriptor = RequestDescriptor::get("/search").with_query_param("", "a");
        assert!(matches!(
            descriptor.validate(),
            Err(ClientError::InvalidParameters(_))
        ));
    }

    #[test]
    fn serializes_json_body() {
        #[derive(Serialize)]
        struct Body<'a> {
            url: &'a str,
            quality: &'a str,
        }

        let descriptor = RequestDescriptor::post("/youtube/mp4")
            .with_json(&Body {
                url: "https://youtu.be/x",
                quality: "720p",
            })
            .unwrap();

        assert_eq!(
            descriptor.body(),
            Some(&json!({"url": "https://youtu.be/x", "quality": "720p"}))
        );
        assert_eq!(descriptor.method(), &Method::POST);
    }

    #[test]
    fn non_string_map_keys_fail_to_serialize() {
        let mut body = HashMap::new();
        body.insert((1, 2), "x");

        let err = RequestDescriptor::post("/x").with_json(&body).unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn binary_kind_and_timeout() {
        let descriptor = RequestDescriptor::get("/spotify/download")
            .binary()
            .with_timeout(Duration::from_secs(5));

        assert_eq!(descriptor.response_kind(), ResponseKind::Binary);
        assert_eq!(descriptor.timeout(), Some(Duration::from_secs(5)));
    }
}

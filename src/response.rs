//! Response wrapper carrying transport metadata next to the payload.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A 2xx response from the service.
///
/// `data` is whatever the call produced ([`Payload`](crate::Payload) for
/// [`Client::request`](crate::Client::request), a typed struct for the endpoint
/// layer); the other fields describe the HTTP exchange.
///
/// # Examples
///
/// ```no_run
/// use cognima::{Auth, RequestDescriptor, configure};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = configure("https://cog2.cognima.com.br/api/v1", Auth::header("X-API-Key", "ck_key"))?;
/// let response = client.request_json(RequestDescriptor::get("/status")).await?;
///
/// println!("Status: {}", response.status);
/// println!("Took {:?}", response.latency);
/// if let Some(data) = response.data() {
///     println!("Key name: {}", data["api_key"]["name"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The response payload.
    pub data: T,

    /// The raw response body as text. Empty for binary downloads.
    pub raw_body: String,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the payload, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cognima::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     "42".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Like [`map`](Self::map) for fallible conversions.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Response<U>, E>
    where
        F: FnOnce(T, &str, StatusCode) -> Result<U, E>,
    {
        let data = f(self.data, &self.raw_body, self.status)?;
        Ok(Response {
            data,
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        })
    }

    /// Returns a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cognima::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("audio/mpeg"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO);
    /// assert_eq!(response.header("content-type"), Some("audio/mpeg"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl Response<crate::Payload> {
    /// The envelope payload of a JSON response, if it was a success.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.envelope()?.data()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

//! The API client.
//!
//! [`Client`] is the single entry point for talking to the service. Configure
//! it once with [`ClientBuilder`], [`configure`] or [`Client::from_env`] and
//! share it freely; clones are cheap and reuse the same connection pool.

use crate::{
    auth::{Auth, AuthStyle},
    config::{parse_base_url, BaseUrl, ClientConfig},
    descriptor::{RequestDescriptor, ResponseKind},
    envelope::{BinaryPayload, Payload, ResponseEnvelope},
    error::ConfigError,
    rate_limit::RateLimitInfo,
    sequence, ClientError, Response, Result,
};
use http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Builds a [`Client`] from a base URL and an auth scheme.
///
/// # Errors
///
/// Returns [`ConfigError`] if `base_url` is not a well-formed absolute
/// `http`/`https` URL or the auth scheme does not form a valid header.
///
/// # Examples
///
/// ```
/// use cognima::{Auth, AuthStyle, configure};
///
/// let client = configure("https://cog.api.br/api/v1", Auth::header("X-API-Key", "ck_key")).unwrap();
/// assert_eq!(client.base_url(), "https://cog.api.br/api/v1");
/// assert_eq!(client.auth_style(), AuthStyle::Header("X-API-Key".to_string()));
///
/// assert!(configure("not a url", Auth::None).is_err());
/// ```
pub fn configure(base_url: &str, auth: Auth) -> Result<Client, ConfigError> {
    Client::new(ClientConfig::new(base_url, auth)?)
}

/// A client for the Cognima API.
///
/// # Examples
///
/// ```no_run
/// use cognima::{Client, RequestDescriptor};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder()
///     .base_url("https://cog.api.br/api/v1")?
///     .api_key_header("X-API-Key", "ck_your_api_key")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let response = client
///     .request_json(RequestDescriptor::get("/likee/info").with_query_param("url", "https://likee.video/v/1"))
///     .await?;
/// println!("{:?}", response.data());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from an already validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_default_headers(config, HeaderMap::new())
    }

    /// Creates a client configured from `COGNIMA_*` environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    fn with_default_headers(
        config: ClientConfig,
        mut default_headers: HeaderMap,
    ) -> Result<Self, ConfigError> {
        if let Some((name, value)) = config.auth().to_header()? {
            default_headers.insert(name, value);
        }

        let user_agent = config
            .user_agent()
            .map(str::to_string)
            .unwrap_or_else(|| concat!("cognima-rs/", env!("CARGO_PKG_VERSION")).to_string());

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                default_headers,
            }),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The base URL exactly as it was supplied.
    pub fn base_url(&self) -> &str {
        self.inner.config.base_url()
    }

    /// The authentication scheme, without its token.
    pub fn auth_style(&self) -> AuthStyle {
        self.inner.config.auth().style()
    }

    /// The default per-request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.config.timeout()
    }

    /// Sends one request and returns its payload.
    ///
    /// JSON responses come back as [`Payload::Envelope`]; a `success: false`
    /// envelope is still `Ok` here. Descriptors marked
    /// [`binary`](RequestDescriptor::binary) come back as [`Payload::Binary`]
    /// without any JSON parsing.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidParameters`] before sending, for duplicate or empty query keys
    /// - [`ClientError::Transport`] when no response arrived (including timeouts)
    /// - [`ClientError::ClientSide`] / [`ClientError::ServerSide`] for 4xx / 5xx
    /// - [`ClientError::Decode`] when a JSON response is not valid JSON
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Response<Payload>> {
        descriptor.validate()?;

        let start_time = Instant::now();
        let response = self.execute_request(&descriptor).await.map_err(|e| {
            tracing::warn!(
                error = %e,
                method = %descriptor.method(),
                path = %descriptor.path(),
                "Request failed"
            );
            e
        })?;

        self.read_response(response, descriptor.response_kind(), start_time)
            .await
    }

    /// Sends a request that must answer with a JSON envelope.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request). A descriptor asking for binary is read
    /// as JSON anyway.
    pub async fn request_json(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Response<ResponseEnvelope>> {
        let response = self
            .request(descriptor.with_response_kind(ResponseKind::Json))
            .await?;

        response.try_map(|payload, raw_body, status| match payload {
            Payload::Envelope(envelope) => Ok(envelope),
            Payload::Binary(_) => Err(ClientError::Decode {
                raw_response: raw_body.to_string(),
                serde_error: "expected a JSON envelope, got a binary body".to_string(),
                status,
            }),
        })
    }

    /// Sends a request and returns the raw body bytes.
    pub async fn request_binary(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Response<BinaryPayload>> {
        let response = self.request(descriptor.binary()).await?;

        response.try_map(|payload, raw_body, status| match payload {
            Payload::Binary(binary) => Ok(binary),
            Payload::Envelope(_) => Err(ClientError::Decode {
                raw_response: raw_body.to_string(),
                serde_error: "expected a binary body, got a JSON envelope".to_string(),
                status,
            }),
        })
    }

    /// Sends a request and decodes the envelope's payload into `T`.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request), plus [`ClientError::Api`] when the
    /// service answered `success: false` and [`ClientError::Decode`] when the
    /// payload does not match `T`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cognima::{Client, RequestDescriptor};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct FileInfo {
    ///     #[serde(rename = "fileName")]
    ///     file_name: String,
    /// }
    ///
    /// # async fn example(client: Client) -> Result<(), cognima::ClientError> {
    /// let descriptor = RequestDescriptor::get("/gdrive/info")
    ///     .with_query_param("url", "https://drive.google.com/file/d/1ABC/view");
    /// let info = client.call::<FileInfo>(descriptor).await?;
    /// println!("{}", info.data.file_name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T>(&self, descriptor: RequestDescriptor) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.request_json(descriptor).await?;
        response.try_map(|envelope, raw_body, status| envelope.into_data(raw_body, status))
    }

    /// Makes a GET request and decodes the payload into `T`.
    pub async fn get<T>(&self, path: impl Into<String>) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.call(RequestDescriptor::get(path)).await
    }

    /// Makes a POST request with a JSON body and decodes the payload into `T`.
    pub async fn post<B, T>(&self, path: impl Into<String>, body: &B) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(RequestDescriptor::post(path).with_json(body)?)
            .await
    }

    /// Sends `descriptors` one after another, waiting `inter_delay` between
    /// consecutive requests.
    ///
    /// Failures do not stop the batch: the result holds one entry per
    /// descriptor, in input order.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cognima::{Client, RequestDescriptor};
    /// use std::time::Duration;
    ///
    /// # async fn example(client: Client) {
    /// let descriptors = ["1033857091", "1234567890"].iter().map(|id| {
    ///     RequestDescriptor::get("/freefire/sendlikes").with_query_param("playerId", id)
    /// });
    ///
    /// for result in client.request_sequence(descriptors, Duration::from_secs(2)).await {
    ///     match result {
    ///         Ok(response) => println!("{:?}", response.data()),
    ///         Err(e) => eprintln!("{}", e),
    ///     }
    /// }
    /// # }
    /// ```
    pub async fn request_sequence<I>(
        &self,
        descriptors: I,
        inter_delay: Duration,
    ) -> Vec<Result<Response<Payload>>>
    where
        I: IntoIterator<Item = RequestDescriptor>,
    {
        let results = sequence::paced(descriptors, inter_delay, |descriptor| {
            self.request(descriptor)
        })
        .await;

        let failures = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            total = results.len(),
            failures = failures,
            "Request sequence finished"
        );

        results
    }

    /// Resolves `path` against the base URL, keeping the base URL's own path.
    pub(crate) fn endpoint_url(&self, descriptor: &RequestDescriptor) -> Url {
        let mut url = self.inner.config.url().clone();
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            descriptor.path().trim_start_matches('/')
        );
        url.set_path(&path);

        for (key, value) in descriptor.query_params() {
            url.query_pairs_mut().append_pair(key, value);
        }

        url
    }

    /// Executes a single request.
    async fn execute_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Response> {
        let url = self.endpoint_url(descriptor);

        tracing::debug!(
            method = %descriptor.method(),
            url = %url,
            kind = ?descriptor.response_kind(),
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .request(descriptor.method().clone(), url);

        for (name, value) in &self.inner.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in descriptor.headers() {
            request = request.header(name, value);
        }

        if let Some(timeout) = descriptor.timeout().or(self.inner.config.timeout()) {
            request = request.timeout(timeout);
        }

        if let Some(body) = descriptor.body() {
            request = request.json(body);
        }

        request.send().await.map_err(ClientError::transport)
    }

    /// Reads the body according to `kind` and classifies the outcome.
    async fn read_response(
        &self,
        response: reqwest::Response,
        kind: ResponseKind,
        start_time: Instant,
    ) -> Result<Response<Payload>> {
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error response body"
                    );
                    String::new()
                }
            };
            return Err(status_error(status, body, headers));
        }

        match kind {
            ResponseKind::Binary => {
                let bytes = response.bytes().await.map_err(ClientError::transport)?;
                let latency = start_time.elapsed();

                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = latency.as_millis(),
                    bytes = bytes.len(),
                    "Received binary response"
                );

                let payload = BinaryPayload {
                    bytes,
                    content_type: header_string(&headers, CONTENT_TYPE),
                    content_disposition: header_string(&headers, CONTENT_DISPOSITION),
                };
                Ok(Response::new(
                    Payload::Binary(payload),
                    String::new(),
                    status,
                    headers,
                    latency,
                ))
            }
            ResponseKind::Json => {
                let raw_body = response.text().await.map_err(ClientError::transport)?;
                let latency = start_time.elapsed();

                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = latency.as_millis(),
                    "Received HTTP response"
                );

                let value = match serde_json::from_str::<serde_json::Value>(&raw_body) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            raw_response = %raw_body,
                            "Failed to decode response"
                        );
                        return Err(ClientError::Decode {
                            raw_response: raw_body,
                            serde_error: e.to_string(),
                            status,
                        });
                    }
                };

                let envelope = ResponseEnvelope::from_value(value, status);
                if let ResponseEnvelope::Failure {
                    error_code,
                    message,
                    ..
                } = &envelope
                {
                    tracing::warn!(
                        error_code = ?error_code,
                        message = %message,
                        "Service reported failure"
                    );
                }

                Ok(Response::new(
                    Payload::Envelope(envelope),
                    raw_body,
                    status,
                    headers,
                    latency,
                ))
            }
        }
    }
}

fn status_error(status: StatusCode, body: String, headers: HeaderMap) -> ClientError {
    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            response = %body,
            "Client error (4xx)"
        );
        let rate_limit_info = RateLimitInfo::from_headers(&headers);
        ClientError::ClientSide {
            status,
            body,
            headers,
            rate_limit_info,
        }
    } else if status.is_server_error() {
        tracing::warn!(
            status = status.as_u16(),
            response = %body,
            "Server error (5xx)"
        );
        ClientError::ServerSide {
            status,
            body,
            headers,
        }
    } else {
        tracing::warn!(status = status.as_u16(), "Unexpected HTTP status");
        ClientError::UnexpectedStatus { status, body }
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use cognima::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), cognima::ConfigError> {
/// let client = ClientBuilder::new()
///     .base_url("https://cog.api.br/api/v1")?
///     .bearer_token("ck_your_api_key")
///     .timeout(Duration::from_secs(30))
///     .default_header("Accept-Language", "pt-BR")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<BaseUrl>,
    auth: Auth,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth: Auth::None,
            default_headers: HeaderMap::new(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute `http`/`https` URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, ConfigError> {
        self.base_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Sets the authentication scheme.
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Sends the API key in a custom header such as `X-API-Key` or `apikey`.
    pub fn api_key_header(self, name: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth(Auth::header(name, token))
    }

    /// Sends the API key as a bearer token.
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.auth(Auth::bearer(token))
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the auth scheme is invalid.
    pub fn build(self) -> Result<Client, ConfigError> {
        let base_url = self.base_url.ok_or(ConfigError::MissingBaseUrl)?;

        let config = ClientConfig::from_parts(base_url, self.auth)?
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent);

        Client::with_default_headers(config, self.default_headers)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        configure(base, Auth::None).unwrap()
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let client = client("https://cog.api.br/api/v1");
        let url = client.endpoint_url(&RequestDescriptor::get("/youtube/search"));
        assert_eq!(url.as_str(), "https://cog.api.br/api/v1/youtube/search");

        let client = self::client("https://cog.api.br/api/v1/");
        let url = client.endpoint_url(&RequestDescriptor::get("status"));
        assert_eq!(url.as_str(), "https://cog.api.br/api/v1/status");
    }

    #[test]
    fn endpoint_url_encodes_query_in_order() {
        let client = client("https://cog.api.br/api/v1");
        let descriptor = RequestDescriptor::get("/search")
            .with_query_param("q", "inteligência artificial")
            .with_query_param("max", 10);

        let url = client.endpoint_url(&descriptor);
        assert_eq!(
            url.as_str(),
            "https://cog.api.br/api/v1/search?q=intelig%C3%AAncia+artificial&max=10"
        );
    }

    #[test]
    fn builder_requires_base_url() {
        let err = Client::builder().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));
    }

    #[test]
    fn builder_round_trips_config() {
        let client = Client::builder()
            .base_url("https://cog2.cognima.com.br/api/v1")
            .unwrap()
            .bearer_token("ck_1")
            .timeout(Duration::from_secs(9))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://cog2.cognima.com.br/api/v1");
        assert_eq!(client.auth_style(), AuthStyle::Bearer);
        assert_eq!(client.timeout(), Some(Duration::from_secs(9)));
        assert!(!format!("{:?}", client).contains("ck_1"));
    }

    #[test]
    fn builder_rejects_bad_default_header() {
        let result = Client::builder().default_header("bad header", "x");
        assert!(matches!(result, Err(ConfigError::InvalidHeader(_))));
    }
}

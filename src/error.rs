//! Error types for configuring the client and calling the API.
//!
//! Configuration problems surface as [`ConfigError`] when a client is built.
//! Everything that can go wrong while talking to the service surfaces as
//! [`ClientError`], which keeps the raw response body, status code and headers
//! around so callers can report what the server actually said.

use crate::rate_limit::RateLimitInfo;
use http::{HeaderMap, StatusCode};

/// An invalid client configuration.
///
/// Returned by [`ClientBuilder::build`](crate::ClientBuilder::build),
/// [`configure`](crate::configure) and [`ClientConfig::from_env`](crate::ClientConfig::from_env).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The base URL could not be parsed at all.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL parsed, but is not an absolute `http`/`https` URL with a host.
    #[error("Base URL must be an absolute http(s) URL with a host, got `{0}`")]
    NotAbsolute(String),

    /// An authentication or default header name/value is not a valid HTTP header.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// No base URL was supplied to the builder.
    #[error("Base URL is required")]
    MissingBaseUrl,

    /// An environment variable was present but unusable.
    #[error("Invalid environment variable {var}: {reason}")]
    InvalidEnv {
        /// The variable name
        var: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// The error type for requests made through a [`Client`](crate::Client).
///
/// # Examples
///
/// ```no_run
/// use cognima::{Auth, ClientError, RequestDescriptor, configure};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = configure("https://cog.api.br/api/v1", Auth::header("X-API-Key", "ck_key"))?;
///
/// match client.request(RequestDescriptor::get("/status")).await {
///     Ok(response) => println!("{:?}", response.data),
///     Err(ClientError::ClientSide { status, body, .. }) => {
///         eprintln!("Rejected with {}: {}", status, body);
///     }
///     Err(ClientError::Transport { timeout: true, .. }) => eprintln!("Timed out"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response (connect, DNS, TLS, timeout).
    ///
    /// `timeout` is `true` when the configured or per-request timeout elapsed.
    #[error("Transport error{}: {source}", timeout_note(.timeout))]
    Transport {
        /// Whether the failure was a timeout
        timeout: bool,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a 4xx status.
    ///
    /// This covers authentication failures, bad parameters and plan or quota
    /// restrictions. Rate limit headers are parsed when present.
    #[error("Client error {status}: {body}")]
    ClientSide {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: HeaderMap,
        /// Rate limit information parsed from headers
        rate_limit_info: Option<RateLimitInfo>,
    },

    /// The server answered with a 5xx status.
    #[error("Server error {status}: {body}")]
    ServerSide {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The server answered with a status that is neither success nor an error class.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
    },

    /// The response body did not decode into the expected shape.
    #[error("Failed to decode response (status {status}): {serde_error}")]
    Decode {
        /// The raw response body that failed to decode
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The request descriptor was rejected before anything was sent.
    #[error("Invalid request parameters: {0}")]
    InvalidParameters(String),

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// The service reported `success: false` in its envelope.
    ///
    /// Only produced by the typed helpers ([`Client::call`](crate::Client::call)
    /// and the endpoint layer); [`Client::request`](crate::Client::request)
    /// returns such envelopes as [`ResponseEnvelope::Failure`](crate::ResponseEnvelope::Failure).
    #[error("API error{}: {message}", code_note(.error_code))]
    Api {
        /// The service's error code, if it sent one
        error_code: Option<String>,
        /// The service's message
        message: String,
        /// The HTTP status the envelope arrived with
        http_status: Option<u16>,
    },

    /// The client configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn transport(source: reqwest::Error) -> Self {
        ClientError::Transport {
            timeout: source.is_timeout(),
            source,
        }
    }

    /// Returns `true` if the request failed because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport { timeout: true, .. })
    }

    /// Returns `true` for 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClientError::ClientSide { .. })
    }

    /// Returns `true` for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::ServerSide { .. })
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognima::ClientError;
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let err = ClientError::ServerSide {
    ///     status: StatusCode::BAD_GATEWAY,
    ///     body: "upstream down".to_string(),
    ///     headers: HeaderMap::new(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    /// assert!(err.is_server_error());
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::ClientSide { status, .. }
            | ClientError::ServerSide { status, .. }
            | ClientError::UnexpectedStatus { status, .. }
            | ClientError::Decode { status, .. } => Some(*status),
            ClientError::Api {
                http_status: Some(code),
                ..
            } => StatusCode::from_u16(*code).ok(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ClientError::ClientSide { body, .. }
            | ClientError::ServerSide { body, .. }
            | ClientError::UnexpectedStatus { body, .. } => Some(body),
            ClientError::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns rate limit information if the server sent any with a 4xx.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            ClientError::ClientSide {
                rate_limit_info, ..
            } => rate_limit_info.as_ref(),
            _ => None,
        }
    }
}

fn timeout_note(timeout: &bool) -> &'static str {
    if *timeout {
        " (timed out)"
    } else {
        ""
    }
}

fn code_note(error_code: &Option<String>) -> String {
    error_code
        .as_deref()
        .map(|code| format!(" [{code}]"))
        .unwrap_or_default()
}

/// A specialized `Result` type for API calls.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_code() {
        let err = ClientError::Api {
            error_code: Some("bad_url".to_string()),
            message: "invalid".to_string(),
            http_status: Some(200),
        };
        assert_eq!(err.to_string(), "API error [bad_url]: invalid");
        assert_eq!(err.status(), Some(StatusCode::OK));

        let err = ClientError::Api {
            error_code: None,
            message: "nope".to_string(),
            http_status: None,
        };
        assert_eq!(err.to_string(), "API error: nope");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn client_side_accessors() {
        let err = ClientError::ClientSide {
            status: StatusCode::FORBIDDEN,
            body: "plan required".to_string(),
            headers: HeaderMap::new(),
            rate_limit_info: None,
        };
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(!err.is_timeout());
        assert_eq!(err.raw_response(), Some("plan required"));
        assert!(err.rate_limit_info().is_none());
    }

    #[test]
    fn config_error_converts() {
        let err: ClientError = ConfigError::MissingBaseUrl.into();
        assert_eq!(err.to_string(), "Base URL is required");
    }
}

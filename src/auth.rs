//! Authentication schemes accepted by the service.

use crate::error::ConfigError;
use http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use std::fmt;

/// How the API key is attached to every request.
///
/// Deployments of the service disagree on the header: some read a custom
/// header (`X-API-Key`, `apikey`), others a bearer token. The header name is
/// therefore part of the configuration.
///
/// The token never shows up in `Debug` output.
///
/// # Examples
///
/// ```
/// use cognima::{Auth, AuthStyle};
///
/// let auth = Auth::header("X-API-Key", "ck_secret");
/// assert_eq!(auth.style(), AuthStyle::Header("X-API-Key".to_string()));
/// assert!(!format!("{:?}", auth).contains("ck_secret"));
///
/// let auth = Auth::bearer("ck_secret");
/// assert_eq!(auth.style(), AuthStyle::Bearer);
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Auth {
    /// No credentials. Some public endpoints accept anonymous calls.
    #[default]
    None,

    /// The token is sent verbatim in a custom header.
    Header {
        /// Header name, e.g. `X-API-Key`
        name: String,
        /// The API key
        token: String,
    },

    /// The token is sent as `Authorization: Bearer <token>`.
    Bearer(String),
}

/// The shape of an [`Auth`] without its secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStyle {
    /// No credentials.
    None,
    /// A custom header with the given name.
    Header(String),
    /// A bearer token in `Authorization`.
    Bearer,
}

impl Auth {
    /// Sends `token` in the header called `name`.
    pub fn header(name: impl Into<String>, token: impl Into<String>) -> Self {
        Auth::Header {
            name: name.into(),
            token: token.into(),
        }
    }

    /// Sends `token` as a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    /// Returns the scheme without the token.
    pub fn style(&self) -> AuthStyle {
        match self {
            Auth::None => AuthStyle::None,
            Auth::Header { name, .. } => AuthStyle::Header(name.clone()),
            Auth::Bearer(_) => AuthStyle::Bearer,
        }
    }

    /// Builds the header pair for this scheme.
    ///
    /// The value is flagged sensitive so `http` keeps it out of debug output.
    pub(crate) fn to_header(&self) -> Result<Option<(HeaderName, HeaderValue)>, ConfigError> {
        let (name, value) = match self {
            Auth::None => return Ok(None),
            Auth::Header { name, token } => {
                let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                    ConfigError::InvalidHeader(format!("auth header name `{}`: {}", name, e))
                })?;
                (name, HeaderValue::try_from(token.as_str()))
            }
            Auth::Bearer(token) => (
                AUTHORIZATION,
                HeaderValue::try_from(format!("Bearer {}", token)),
            ),
        };

        let mut value = value
            .map_err(|e| ConfigError::InvalidHeader(format!("auth token: {}", e)))?;
        value.set_sensitive(true);
        Ok(Some((name, value)))
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Header { name, .. } => f
                .debug_struct("Header")
                .field("name", name)
                .field("token", &"<redacted>")
                .finish(),
            Auth::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

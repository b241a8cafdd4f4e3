//! Immutable client configuration.

use crate::auth::Auth;
use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

/// Base URL of the media and download deployment.
pub const DEFAULT_BASE_URL: &str = "https://cog.api.br/api/v1";

/// Base URL of the deployment serving completions, search and key status.
pub const AI_BASE_URL: &str = "https://cog2.cognima.com.br/api/v1";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "COGNIMA_API_KEY";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "COGNIMA_BASE_URL";
/// Environment variable naming the auth header, or `bearer`.
pub const ENV_AUTH_HEADER: &str = "COGNIMA_AUTH_HEADER";
/// Environment variable holding the default timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "COGNIMA_TIMEOUT_SECS";

/// Header used for the API key when `COGNIMA_AUTH_HEADER` is unset.
pub const DEFAULT_AUTH_HEADER: &str = "X-API-Key";

/// Everything a [`Client`](crate::Client) needs, validated once.
///
/// Build one through [`ClientBuilder`](crate::ClientBuilder) or
/// [`ClientConfig::from_env`]; it cannot change afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: BaseUrl,
    auth: Auth,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Validates `base_url` and bundles it with the auth scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `base_url` is not an absolute `http`/`https`
    /// URL with a host, or if `auth` does not form a valid header.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self, ConfigError> {
        Self::from_parts(parse_base_url(base_url)?, auth)
    }

    pub(crate) fn from_parts(base_url: BaseUrl, auth: Auth) -> Result<Self, ConfigError> {
        auth.to_header()?;

        Ok(Self {
            base_url,
            auth,
            timeout: None,
            user_agent: None,
        })
    }

    pub(crate) fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `COGNIMA_API_KEY` | API key | none (anonymous) |
    /// | `COGNIMA_BASE_URL` | base URL | [`DEFAULT_BASE_URL`] |
    /// | `COGNIMA_AUTH_HEADER` | header name, or `bearer` | `X-API-Key` |
    /// | `COGNIMA_TIMEOUT_SECS` | default timeout | none |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let auth = match non_empty(ENV_API_KEY) {
            None => Auth::None,
            Some(token) => {
                let header = non_empty(ENV_AUTH_HEADER)
                    .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string());
                if header.eq_ignore_ascii_case("bearer") {
                    Auth::bearer(token)
                } else {
                    Auth::header(header, token)
                }
            }
        };
        let timeout = non_empty(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::InvalidEnv {
                        var: ENV_TIMEOUT_SECS,
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self::new(&base_url, auth)?.with_timeout(timeout))
    }

    /// The base URL exactly as it was supplied.
    pub fn base_url(&self) -> &str {
        &self.base_url.raw
    }

    /// The parsed base URL every request path is appended to.
    pub fn url(&self) -> &Url {
        &self.base_url.parsed
    }

    /// The authentication scheme, including its token.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The default per-request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The `User-Agent` sent with every request, if overridden.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// A validated base URL. `Url` normalizes (a bare host gains a trailing
/// `/`), so the supplied text is kept next to the parsed form.
#[derive(Debug, Clone)]
pub(crate) struct BaseUrl {
    raw: String,
    parsed: Url,
}

pub(crate) fn parse_base_url(raw: &str) -> Result<BaseUrl, ConfigError> {
    let parsed = Url::parse(raw.trim())?;

    let is_http = matches!(parsed.scheme(), "http" | "https");
    if !is_http || parsed.host_str().is_none() || parsed.cannot_be_a_base() {
        return Err(ConfigError::NotAbsolute(raw.to_string()));
    }

    Ok(BaseUrl {
        raw: raw.to_string(),
        parsed,
    })
}

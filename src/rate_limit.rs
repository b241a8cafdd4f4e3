//! Quota headers attached to rejected requests.
//!
//! The service enforces per-key hourly and daily quotas. When it rejects a
//! request with a 4xx it may say when the quota resets. The client never waits
//! on its own; it parses these headers into [`RateLimitInfo`] and hands them to
//! the caller inside [`ClientError::ClientSide`](crate::ClientError::ClientSide).

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Quota information parsed from response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// How long the server asked us to wait (`Retry-After`).
    pub retry_after: Option<Duration>,

    /// When the current window resets (`X-RateLimit-Reset` / `RateLimit-Reset`).
    pub reset_at: Option<SystemTime>,

    /// Requests allowed per window (`X-RateLimit-Limit`).
    pub limit: Option<u64>,

    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: Option<u64>,
}

impl RateLimitInfo {
    /// Parses quota headers, returning `None` when the response carried none.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognima::rate_limit::RateLimitInfo;
    /// use http::HeaderMap;
    /// use std::time::Duration;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("retry-after", "60".parse().unwrap());
    /// headers.insert("x-ratelimit-remaining", "0".parse().unwrap());
    ///
    /// let info = RateLimitInfo::from_headers(&headers).unwrap();
    /// assert_eq!(info.retry_after, Some(Duration::from_secs(60)));
    /// assert!(info.is_exhausted());
    ///
    /// assert!(RateLimitInfo::from_headers(&HeaderMap::new()).is_none());
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let info = Self {
            retry_after: parse_retry_after(headers),
            reset_at: parse_reset(headers),
            limit: parse_u64(headers, "x-ratelimit-limit"),
            remaining: parse_u64(headers, "x-ratelimit-remaining"),
        };

        if info.retry_after.is_none()
            && info.reset_at.is_none()
            && info.limit.is_none()
            && info.remaining.is_none()
        {
            None
        } else {
            Some(info)
        }
    }

    /// Returns `true` if the server signalled that the quota is used up.
    pub fn is_exhausted(&self) -> bool {
        self.retry_after.is_some() || self.remaining == Some(0)
    }

    /// Returns how long to wait before the quota frees up, capped at `max_wait`.
    ///
    /// `Retry-After` wins over the reset timestamp.
    pub fn wait_time(&self, max_wait: Duration) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after.min(max_wait));
        }

        let until_reset = self.reset_at?.duration_since(SystemTime::now()).ok()?;
        Some(until_reset.min(max_wait))
    }
}

/// Parses `Retry-After` as delay-seconds or an HTTP date.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get("retry-after")?.to_str().ok()?.trim();

    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = httpdate::parse_http_date(header).ok()?;
    // A date in the past means "now".
    Some(date.duration_since(SystemTime::now()).unwrap_or(Duration::ZERO))
}

/// Parses a Unix timestamp from either reset header.
fn parse_reset(headers: &HeaderMap) -> Option<SystemTime> {
    ["x-ratelimit-reset", "ratelimit-reset"]
        .iter()
        .find_map(|name| parse_u64(headers, name))
        .map(|timestamp| UNIX_EPOCH + Duration::from_secs(timestamp))
}

fn parse_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("60"));

        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_retry_after_http_date_in_past() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "retry-after",
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );

        assert_eq!(parse_retry_after(&headers), Some(Duration::ZERO));
    }

    #[test]
    fn test_reset_prefers_x_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("100"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("200"));

        assert_eq!(
            parse_reset(&headers),
            Some(UNIX_EPOCH + Duration::from_secs(100))
        );
    }

    #[test]
    fn test_limit_and_remaining() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("500"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));

        let info = RateLimitInfo::from_headers(&headers).unwrap();
        assert_eq!(info.limit, Some(500));
        assert_eq!(info.remaining, Some(42));
        assert!(!info.is_exhausted());
        assert_eq!(info.wait_time(Duration::from_secs(10)), None);
    }

    #[test]
    fn test_wait_time_from_reset() {
        let mut headers = HeaderMap::new();
        let reset = SystemTime::now() + Duration::from_secs(3);
        let timestamp = reset.duration_since(UNIX_EPOCH).unwrap().as_secs();
        headers.insert(
            "x-ratelimit-reset",
            HeaderValue::from_str(&timestamp.to_string()).unwrap(),
        );
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));

        let info = RateLimitInfo::from_headers(&headers).unwrap();
        assert!(info.is_exhausted());

        // Whole-second timestamps can shave up to a second off.
        let wait = info.wait_time(Duration::from_secs(300)).unwrap();
        assert!(wait >= Duration::from_secs(1) && wait <= Duration::from_secs(3));
    }

    #[test]
    fn test_wait_time_capped() {
        let info = RateLimitInfo {
            retry_after: Some(Duration::from_secs(600)),
            reset_at: None,
            limit: None,
            remaining: Some(0),
        };

        assert_eq!(
            info.wait_time(Duration::from_secs(300)),
            Some(Duration::from_secs(300))
        );
    }
}

//! # Cognima - A typed async client for the Cognima API
//!
//! Cognima exposes one HTTP API in front of many third-party services: video
//! and social platforms, file hosts, music and lyrics services, app stores, a
//! movie and series catalog, web search, language models and image tools. This crate is built on top of `reqwest` and
//! provides a small core (configure once, send a request, classify the
//! answer) plus typed wrappers for the individual endpoints.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cognima::{Auth, Client, DEFAULT_BASE_URL};
//! use cognima::endpoints::{best_media, Platform};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cognima::ClientError> {
//!     let client = Client::builder()
//!         .base_url(DEFAULT_BASE_URL)?
//!         .auth(Auth::header("X-API-Key", "ck_your_api_key"))
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     // One platform, typed
//!     let video = client
//!         .media()
//!         .download(Platform::Vimeo, "https://vimeo.com/76979871")
//!         .await?;
//!     println!("{:?} took {:?}", video.data.title, video.latency);
//!
//!     // Anything the extractor understands
//!     let all = client.media().all_media("https://youtu.be/dQw4w9WgXcQ").await?;
//!     if let Some(best) = best_media(&all.data.media) {
//!         println!("Best: {}", best.url);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Explicit configuration** - Base URL and auth scheme are validated once, at construction
//! - **Envelope classification** - `{"success": false, ...}` answers become values, not guesses
//! - **Rich error handling** - Transport, 4xx, 5xx, decode and API failures are distinct variants
//! - **Binary downloads** - File bodies come back as unmodified bytes with their headers
//! - **Paced sequences** - Run a batch of requests in order with a fixed delay between them
//! - **Automatic logging** - Structured logging with `tracing` for observability
//! - **Response metadata** - Latency, status code, headers and the raw body travel with the data
//!
//! ## Error Handling
//!
//! Every failure keeps what the service actually sent:
//!
//! ```no_run
//! use cognima::{Client, ClientError, RequestDescriptor};
//!
//! # async fn example(client: Client) {
//! let descriptor = RequestDescriptor::get("/reddit/download")
//!     .with_query_param("url", "https://reddit.com/r/rust/comments/abc");
//!
//! match client.call::<serde_json::Value>(descriptor).await {
//!     Ok(response) => println!("Success: {}", response.data),
//!     Err(ClientError::Api { error_code, message, .. }) => {
//!         eprintln!("Service refused ({:?}): {}", error_code, message);
//!     }
//!     Err(ClientError::ClientSide { status, rate_limit_info: Some(info), .. }) => {
//!         eprintln!("HTTP {}, retry after {:?}", status, info.retry_after);
//!     }
//!     Err(e) if e.is_timeout() => eprintln!("Timed out"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # }
//! ```
//!
//! ## Configuration from the environment
//!
//! [`Client::from_env`] reads `COGNIMA_API_KEY`, `COGNIMA_BASE_URL`,
//! `COGNIMA_AUTH_HEADER` and `COGNIMA_TIMEOUT_SECS`; see
//! [`ClientConfig::from_env`].

mod auth;
mod client;
mod config;
mod descriptor;
pub mod endpoints;
mod envelope;
mod error;
pub mod rate_limit;
mod response;
pub mod sequence;

pub use auth::{Auth, AuthStyle};
pub use client::{configure, Client, ClientBuilder};
pub use config::{
    ClientConfig, AI_BASE_URL, DEFAULT_AUTH_HEADER, DEFAULT_BASE_URL, ENV_API_KEY,
    ENV_AUTH_HEADER, ENV_BASE_URL, ENV_TIMEOUT_SECS,
};
pub use descriptor::{RequestDescriptor, ResponseKind};
pub use envelope::{BinaryPayload, Payload, ResponseEnvelope};
pub use error::{ClientError, ConfigError, Result};
pub use rate_limit::RateLimitInfo;
pub use response::Response;

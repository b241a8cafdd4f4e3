//! Typed wrappers for the service's endpoints.
//!
//! Each group borrows a [`Client`] and maps one method to one remote endpoint:
//! parameter names in, typed structs out. Nothing here talks HTTP directly;
//! everything goes through [`Client::call`] or [`Client::request_binary`].
//!
//! ```no_run
//! use cognima::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env()?;
//!
//! let found = client.music().spotify_search_one("Bohemian Rhapsody Queen").await?;
//! println!("{} by {}", found.data.name, found.data.artists);
//! # Ok(())
//! # }
//! ```

mod ai;
mod apps;
mod catalog;
mod files;
mod freefire;
mod image;
mod media;
mod music;
mod pinterest;
mod search;
mod status;
mod youtube;

pub use ai::{
    Ai, ChatMessage, Choice, Completion, CompletionRequest, CustomModel, CustomModelRequest,
    GeneratedImage, ImageGeneration, ImageRequest, TokenUsage,
};
pub use apps::{
    AppDetails, AppSearch, AppSearchOptions, AppStore, AppSummary, Apps, SimilarApps, StoreSearch,
};
pub use catalog::{
    Catalog, Category, Episode, Movie, MovieDetails, Series, SeriesDetails, TitleInfo,
};
pub use files::{FileInfo, Files};
pub use freefire::{FreeFire, LikesOutcome, LikesReport, LikesRules, LikesSummary, ServiceInfo};
pub use image::{Image, ImageResult};
pub use media::{
    best_media, best_quality, AllMedia, InstagramMedia, InstagramPost, Media, MediaFormat,
    MediaItem, MediaKind, MediaMetadata, MediaSummary, Platform, QualityUrl, SocialAuthor,
    TikTokVideo, VideoQuality, VideoStats,
};
pub use music::{
    Lyrics, Music, SoundCloudDownload, SoundCloudSearch, SoundCloudSearchDownload,
    SoundCloudTrack, SpotifySearch, SpotifyTrack,
};
pub use pinterest::{Pin, Pinterest, PinterestDownload, PinterestSearch};
pub use search::{Search, SearchHit, SearchResults};
pub use status::{
    ApiKeyInfo, DailyLimits, KeyStatus, Limits, ModelStats, ModelSummary, Quota, Status, Usage,
    UsagePeriod,
};
pub use youtube::{Mp3Download, Mp4Download, YouTube, YouTubeChannel, YouTubeSearch, YouTubeVideo};

use crate::{Client, ClientError, Payload, RequestDescriptor, Response, ResponseEnvelope, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

impl Client {
    /// API key status and usage statistics.
    pub fn status(&self) -> Status<'_> {
        Status::new(self)
    }

    /// Chat completions, image generation and custom models.
    pub fn ai(&self) -> Ai<'_> {
        Ai::new(self)
    }

    /// Video platforms, TikTok, Instagram and the catch-all media extractor.
    pub fn media(&self) -> Media<'_> {
        Media::new(self)
    }

    /// YouTube search and downloads.
    pub fn youtube(&self) -> YouTube<'_> {
        YouTube::new(self)
    }

    /// Spotify, SoundCloud and lyrics.
    pub fn music(&self) -> Music<'_> {
        Music::new(self)
    }

    /// Pinterest search and downloads.
    pub fn pinterest(&self) -> Pinterest<'_> {
        Pinterest::new(self)
    }

    /// Google Play and App Store lookups.
    pub fn apps(&self) -> Apps<'_> {
        Apps::new(self)
    }

    /// Movies and series.
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self)
    }

    /// File hosts (MediaFire, Google Drive).
    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    /// Web and news search.
    pub fn search(&self) -> Search<'_> {
        Search::new(self)
    }

    /// Image tools.
    pub fn image(&self) -> Image<'_> {
        Image::new(self)
    }

    /// Free Fire likes service.
    pub fn freefire(&self) -> FreeFire<'_> {
        FreeFire::new(self)
    }
}

/// Calls `descriptor` and decodes one field of the envelope's payload.
///
/// Used for endpoints that answer `{"success": true, "info": {...}}` instead
/// of wrapping their payload in `data`.
pub(crate) async fn call_field<T>(
    client: &Client,
    descriptor: RequestDescriptor,
    field: &'static str,
) -> Result<Response<T>>
where
    T: DeserializeOwned,
{
    let response = client.call::<Map<String, Value>>(descriptor).await?;

    response.try_map(|mut fields, raw_body, status| {
        let value = fields
            .remove(field)
            .ok_or_else(|| decode_error(raw_body, status, format!("missing field `{}`", field)))?;
        serde_json::from_value(value).map_err(|e| decode_error(raw_body, status, e.to_string()))
    })
}

/// Decodes one result of [`Client::request_sequence`] the way [`Client::call`] would.
pub(crate) fn decode_payload<T>(response: Response<Payload>) -> Result<Response<T>>
where
    T: DeserializeOwned,
{
    response.try_map(|payload, raw_body, status| {
        expect_envelope(payload, raw_body, status)?.into_data(raw_body, status)
    })
}

pub(crate) fn expect_envelope(
    payload: Payload,
    raw_body: &str,
    status: StatusCode,
) -> Result<ResponseEnvelope> {
    match payload {
        Payload::Envelope(envelope) => Ok(envelope),
        Payload::Binary(_) => Err(decode_error(
            raw_body,
            status,
            "expected a JSON envelope, got a binary body".to_string(),
        )),
    }
}

pub(crate) fn decode_error(raw_body: &str, status: StatusCode, message: String) -> ClientError {
    ClientError::Decode {
        raw_response: raw_body.to_string(),
        serde_error: message,
        status,
    }
}

/// `{"url": ...}`, the body most POST endpoints take.
#[derive(serde::Serialize)]
pub(crate) struct UrlBody<'a> {
    pub url: &'a str,
}

/// `{"query": ...}`
#[derive(serde::Serialize)]
pub(crate) struct QueryBody<'a> {
    pub query: &'a str,
}

//! Video platforms and the catch-all extractor.
//!
//! The single-platform endpoints all follow `/{platform}/{download,info,formats}?url=`
//! and return loosely shaped records, so [`MediaItem`] types the common
//! fields and keeps the rest in `extra`.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::endpoints::{call_field, QueryBody, UrlBody};
use crate::{Client, RequestDescriptor, Response, Result};

/// Endpoints for video and media platforms.
pub struct Media<'a> {
    client: &'a Client,
}

/// Platforms served by the `/{platform}/{download,info,formats}` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Bandcamp,
    Dailymotion,
    Likee,
    Reddit,
    Streamable,
    Twitch,
    Twitter,
    Vimeo,
}

impl Platform {
    /// Path segment used by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Bandcamp => "bandcamp",
            Platform::Dailymotion => "dailymotion",
            Platform::Likee => "likee",
            Platform::Reddit => "reddit",
            Platform::Streamable => "streamable",
            Platform::Twitch => "twitch",
            Platform::Twitter => "twitter",
            Platform::Vimeo => "vimeo",
        }
    }

    /// Whether the service exposes `/formats` for this platform.
    pub fn has_formats(self) -> bool {
        !matches!(self, Platform::Likee | Platform::Reddit | Platform::Twitter)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloadable item or its metadata, as returned by the platform endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default)]
    pub title: Option<String>,
    /// Author, streamer or artist, whichever the platform reports.
    #[serde(default, alias = "streamer", alias = "artist")]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Platform-specific fields (likes, subreddit, album, game, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a `/formats` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFormat {
    pub format_id: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Media types the catch-all extractor can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }
}

/// Metadata block of `/alldl`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub uploader: Option<String>,
}

/// One downloadable stream found by `/alldl`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub is_best: bool,
    /// Codec, bitrate, fps and similar stream details.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything `/alldl` found at a URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllMedia {
    pub metadata: MediaMetadata,
    pub media: Vec<MediaSummary>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub video_count: Option<u64>,
    #[serde(default)]
    pub audio_count: Option<u64>,
    #[serde(default)]
    pub image_count: Option<u64>,
}

impl AllMedia {
    /// The stream the service flagged as best, see [`best_media`].
    pub fn best(&self) -> Option<&MediaSummary> {
        best_media(&self.media)
    }
}

/// A resolution offered by a platform (e.g. Facebook's quality list).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuality {
    pub resolution: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub should_render: bool,
}

/// Returns the first stream flagged `isBest`.
pub fn best_media(items: &[MediaSummary]) -> Option<&MediaSummary> {
    items.iter().find(|item| item.is_best)
}

/// Picks 1080p, then 720p, then whatever comes first.
pub fn best_quality(videos: &[VideoQuality]) -> Option<&VideoQuality> {
    ["1080p", "720p"]
        .iter()
        .find_map(|wanted| videos.iter().find(|v| v.resolution.contains(wanted)))
        .or_else(|| videos.first())
}

/// One rendition of a video, as listed by TikTok and Pinterest.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityUrl {
    #[serde(default)]
    pub quality: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialAuthor {
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStats {
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokVideo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<SocialAuthor>,
    #[serde(default)]
    pub stats: VideoStats,
    #[serde(default)]
    pub urls: Vec<QualityUrl>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstagramPost {
    /// `image`, `video` or `carousel`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub author: Option<SocialAuthor>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub media: Vec<InstagramMedia>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstagramMedia {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub url: String,
}

impl<'a> Media<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn descriptor(platform: Platform, action: &str, url: &str) -> RequestDescriptor {
        RequestDescriptor::get(format!("/{}/{}", platform, action)).with_query_param("url", url)
    }

    /// `GET /{platform}/download?url=`
    pub async fn download(&self, platform: Platform, url: &str) -> Result<Response<MediaItem>> {
        self.client
            .call(Self::descriptor(platform, "download", url))
            .await
    }

    /// `GET /{platform}/info?url=`
    pub async fn info(&self, platform: Platform, url: &str) -> Result<Response<MediaItem>> {
        call_field(self.client, Self::descriptor(platform, "info", url), "info").await
    }

    /// `GET /{platform}/formats?url=`
    pub async fn formats(
        &self,
        platform: Platform,
        url: &str,
    ) -> Result<Response<Vec<MediaFormat>>> {
        call_field(
            self.client,
            Self::descriptor(platform, "formats", url),
            "formats",
        )
        .await
    }

    /// `GET /alldl?url=`
    pub async fn all_media(&self, url: &str) -> Result<Response<AllMedia>> {
        let descriptor = RequestDescriptor::get("/alldl").with_query_param("url", url);
        self.client.call(descriptor).await
    }

    /// `GET /alldl/type?url=&type=`
    pub async fn all_media_by_kind(
        &self,
        url: &str,
        kind: MediaKind,
    ) -> Result<Response<AllMedia>> {
        let descriptor = RequestDescriptor::get("/alldl/type")
            .with_query_param("url", url)
            .with_query_param("type", kind.as_str());
        self.client.call(descriptor).await
    }

    /// `GET /facebook/download?url=`, the qualities on offer.
    pub async fn facebook_qualities(&self, url: &str) -> Result<Response<Vec<VideoQuality>>> {
        let descriptor = RequestDescriptor::get("/facebook/download").with_query_param("url", url);
        call_field(self.client, descriptor, "videos").await
    }

    /// `POST /tiktok/download`
    pub async fn tiktok_download(&self, url: &str) -> Result<Response<TikTokVideo>> {
        self.client.post("/tiktok/download", &UrlBody { url }).await
    }

    /// `POST /tiktok/search`
    ///
    /// The result shape is not fixed by the service, so it is returned as-is.
    pub async fn tiktok_search(&self, query: &str) -> Result<Response<Value>> {
        self.client.post("/tiktok/search", &QueryBody { query }).await
    }

    /// `POST /instagram/download`
    pub async fn instagram_download(&self, url: &str) -> Result<Response<InstagramPost>> {
        self.client.post("/instagram/download", &UrlBody { url }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quality(resolution: &str) -> VideoQuality {
        VideoQuality {
            resolution: resolution.to_string(),
            url: None,
            thumbnail: None,
            should_render: false,
        }
    }

    #[test]
    fn best_quality_prefers_1080p() {
        let videos = vec![quality("360p"), quality("720p (HD)"), quality("1080p (HD)")];
        assert_eq!(best_quality(&videos).unwrap().resolution, "1080p (HD)");
    }

    #[test]
    fn best_quality_falls_back_to_720p_then_first() {
        let videos = vec![quality("360p"), quality("720p")];
        assert_eq!(best_quality(&videos).unwrap().resolution, "720p");

        let videos = vec![quality("480p"), quality("360p")];
        assert_eq!(best_quality(&videos).unwrap().resolution, "480p");

        assert!(best_quality(&[]).is_none());
    }

    #[test]
    fn best_media_finds_flagged_item() {
        let items: Vec<MediaSummary> = serde_json::from_value(json!([
            {"type": "audio", "url": "https://a", "isBest": false},
            {"type": "video", "url": "https://b", "isBest": true, "fps": 30},
            {"type": "video", "url": "https://c", "isBest": true}
        ]))
        .unwrap();

        let best = best_media(&items).unwrap();
        assert_eq!(best.url, "https://b");
        assert_eq!(best.kind, MediaKind::Video);
        assert_eq!(best.extra.get("fps"), Some(&json!(30)));
    }

    #[test]
    fn best_media_none_flagged() {
        let items: Vec<MediaSummary> =
            serde_json::from_value(json!([{"type": "image", "url": "https://a"}])).unwrap();
        assert!(best_media(&items).is_none());
    }

    #[test]
    fn media_item_aliases_author() {
        let item: MediaItem = serde_json::from_value(json!({
            "title": "VOD",
            "streamer": "someone",
            "game": "Chess",
            "downloadUrl": "https://dl"
        }))
        .unwrap();

        assert_eq!(item.author.as_deref(), Some("someone"));
        assert_eq!(item.download_url.as_deref(), Some("https://dl"));
        assert_eq!(item.extra.get("game"), Some(&json!("Chess")));
    }

    #[test]
    fn platform_paths() {
        assert_eq!(Platform::Dailymotion.to_string(), "dailymotion");
        assert!(Platform::Vimeo.has_formats());
        assert!(!Platform::Likee.has_formats());
    }
}

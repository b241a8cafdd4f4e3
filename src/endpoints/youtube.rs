use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::endpoints::{decode_error, QueryBody, UrlBody};
use crate::{Client, Response, Result};

/// YouTube search and downloads.
pub struct YouTube<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearch {
    #[serde(default)]
    pub count: u64,
    pub results: Vec<YouTubeVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeVideo {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub channel: Option<YouTubeChannel>,
    /// Sent as a formatted string by the service ("1.2M views").
    #[serde(default)]
    pub views: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeChannel {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// An MP3 rendition, delivered inline as base64.
#[derive(Debug, Clone, Deserialize)]
pub struct Mp3Download {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64-encoded audio as sent by the service.
    pub buffer: String,
    #[serde(skip)]
    audio: Bytes,
}

impl Mp3Download {
    /// The decoded audio. Filled in by [`YouTube::mp3`].
    pub fn audio(&self) -> &Bytes {
        &self.audio
    }

    fn decode_buffer(mut self) -> Result<Self, base64::DecodeError> {
        self.audio = Bytes::from(general_purpose::STANDARD.decode(self.buffer.as_bytes())?);
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mp4Download {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
struct Mp4Body<'a> {
    url: &'a str,
    quality: &'a str,
}

impl<'a> YouTube<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `POST /youtube/search`
    pub async fn search(&self, query: &str) -> Result<Response<YouTubeSearch>> {
        self.client
            .post("/youtube/search", &QueryBody { query })
            .await
    }

    /// `POST /youtube/mp3`
    ///
    /// The buffer is decoded here; a malformed one is a decode error.
    pub async fn mp3(&self, url: &str) -> Result<Response<Mp3Download>> {
        let response = self
            .client
            .post::<_, Mp3Download>("/youtube/mp3", &UrlBody { url })
            .await?;

        response.try_map(|download, raw_body, status| {
            download.decode_buffer().map_err(|e| {
                decode_error(raw_body, status, format!("invalid audio buffer: {}", e))
            })
        })
    }

    /// `POST /youtube/mp4` with a quality such as `"720p"`.
    pub async fn mp4(&self, url: &str, quality: &str) -> Result<Response<Mp4Download>> {
        self.client
            .post("/youtube/mp4", &Mp4Body { url, quality })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mp3_buffer() {
        let download: Mp3Download = serde_json::from_value(json!({
            "title": "Song",
            "filename": "song.mp3",
            "buffer": "SUQz"
        }))
        .unwrap();
        assert!(download.audio().is_empty());

        let download = download.decode_buffer().unwrap();
        assert_eq!(download.audio(), &Bytes::from_static(b"ID3"));
    }

    #[test]
    fn rejects_bad_buffer() {
        let download: Mp3Download =
            serde_json::from_value(json!({"buffer": "not base64!"})).unwrap();
        assert!(download.decode_buffer().is_err());
    }

    #[test]
    fn search_result_shape() {
        let search: YouTubeSearch = serde_json::from_value(json!({
            "count": 1,
            "results": [{
                "title": "Rust",
                "url": "https://youtube.com/watch?v=1",
                "channel": {"name": "Ferris"},
                "views": "1M"
            }]
        }))
        .unwrap();

        assert_eq!(search.results[0].channel.as_ref().unwrap().name, "Ferris");
    }
}

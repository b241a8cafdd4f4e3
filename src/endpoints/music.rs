use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::endpoints::{call_field, decode_payload, QueryBody};
use crate::{BinaryPayload, Client, RequestDescriptor, Response, Result};

/// Spotify, SoundCloud and lyrics endpoints.
pub struct Music<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearch {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub total: u64,
    pub results: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub index: Option<u32>,
    pub name: String,
    /// Comma-separated artist names.
    pub artists: String,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundCloudSearch {
    #[serde(default)]
    pub total: u64,
    pub results: Vec<SoundCloudTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundCloudTrack {
    pub title: String,
    /// Artist id; numeric or textual depending on the track.
    #[serde(default)]
    pub artist: Option<Value>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub playback_count: Option<u64>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub genre: Option<String>,
    pub permalink_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundCloudDownload {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub download_url: String,
}

/// Result of `/soundcloud/search-download`: the best match and its download.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundCloudSearchDownload {
    pub track: SoundCloudTrack,
    pub download: SoundCloudDownload,
}

/// Best lyrics match for a free-text query.
#[derive(Debug, Clone, Deserialize)]
pub struct Lyrics {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Usually a number, sometimes a date string.
    #[serde(default)]
    pub year: Option<Value>,
    pub lyrics: String,
}

impl<'a> Music<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn search_descriptor(path: &str, query: &str, limit: Option<u32>) -> RequestDescriptor {
        RequestDescriptor::get(path)
            .with_query_param("q", query)
            .with_optional_query_param("limit", limit)
    }

    /// `GET /spotify/search?q=&limit=`
    pub async fn spotify_search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Response<SpotifySearch>> {
        self.client
            .call(Self::search_descriptor("/spotify/search", query, limit))
            .await
    }

    /// `GET /spotify/search-one?q=`
    pub async fn spotify_search_one(&self, query: &str) -> Result<Response<SpotifyTrack>> {
        let descriptor = Self::search_descriptor("/spotify/search-one", query, None);
        call_field(self.client, descriptor, "result").await
    }

    /// Runs one `spotify_search` per query, `delay` apart.
    ///
    /// Returns one result per query, in order; a failed search does not stop
    /// the rest.
    pub async fn spotify_search_many<I, Q>(
        &self,
        queries: I,
        limit: Option<u32>,
        delay: Duration,
    ) -> Vec<Result<Response<SpotifySearch>>>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<str>,
    {
        let descriptors = queries
            .into_iter()
            .map(|q| Self::search_descriptor("/spotify/search", q.as_ref(), limit));

        self.client
            .request_sequence(descriptors, delay)
            .await
            .into_iter()
            .map(|result| result.and_then(decode_payload))
            .collect()
    }

    /// `GET /spotify/download?url=`, the audio file itself.
    ///
    /// The file name, when the service sends one, is in
    /// [`BinaryPayload::filename`].
    pub async fn spotify_download(&self, url: &str) -> Result<Response<BinaryPayload>> {
        let descriptor = RequestDescriptor::get("/spotify/download").with_query_param("url", url);
        self.client.request_binary(descriptor).await
    }

    /// `GET /soundcloud/search?q=&limit=`
    pub async fn soundcloud_search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Response<SoundCloudSearch>> {
        self.client
            .call(Self::search_descriptor("/soundcloud/search", query, limit))
            .await
    }

    /// `GET /soundcloud/search-one?q=`
    pub async fn soundcloud_search_one(&self, query: &str) -> Result<Response<SoundCloudTrack>> {
        let descriptor = Self::search_descriptor("/soundcloud/search-one", query, None);
        call_field(self.client, descriptor, "result").await
    }

    /// `GET /soundcloud/download?url=`
    pub async fn soundcloud_download(&self, url: &str) -> Result<Response<SoundCloudDownload>> {
        let descriptor =
            RequestDescriptor::get("/soundcloud/download").with_query_param("url", url);
        self.client.call(descriptor).await
    }

    /// `GET /soundcloud/search-download?q=`
    pub async fn soundcloud_search_download(
        &self,
        query: &str,
    ) -> Result<Response<SoundCloudSearchDownload>> {
        let descriptor = Self::search_descriptor("/soundcloud/search-download", query, None);
        self.client.call(descriptor).await
    }

    /// `POST /lyrics/search`
    pub async fn lyrics(&self, query: &str) -> Result<Response<Lyrics>> {
        self.client.post("/lyrics/search", &QueryBody { query }).await
    }
}

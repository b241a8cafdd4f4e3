use serde::Deserialize;
use serde_json::{Map, Value};

use crate::endpoints::{QualityUrl, QueryBody, UrlBody};
use crate::{Client, Response, Result};

/// Pinterest search and downloads.
///
/// Served by the [`AI_BASE_URL`](crate::AI_BASE_URL) deployment.
pub struct Pinterest<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinterestSearch {
    #[serde(default)]
    pub count: u64,
    pub results: Vec<Pin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pin {
    #[serde(default)]
    pub title: Option<String>,
    pub link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinterestDownload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub urls: Vec<QualityUrl>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'a> Pinterest<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `POST /pinterest/search`
    pub async fn search(&self, query: &str) -> Result<Response<PinterestSearch>> {
        self.client
            .post("/pinterest/search", &QueryBody { query })
            .await
    }

    /// `POST /pinterest/download`
    pub async fn download(&self, url: &str) -> Result<Response<PinterestDownload>> {
        self.client
            .post("/pinterest/download", &UrlBody { url })
            .await
    }
}

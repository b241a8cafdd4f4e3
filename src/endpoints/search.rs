use serde::Deserialize;

use crate::{Client, RequestDescriptor, Response, Result};

/// Web and news search.
pub struct Search<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    #[serde(default)]
    pub total_results: u64,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// Source domain as shown to users; mostly set on news hits.
    #[serde(default)]
    pub display_url: Option<String>,
}

impl<'a> Search<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `GET /search?q=&max=`
    pub async fn web(&self, query: &str, max: Option<u32>) -> Result<Response<SearchResults>> {
        self.query("/search", query, max).await
    }

    /// `GET /search/news?q=&max=`
    pub async fn news(&self, query: &str, max: Option<u32>) -> Result<Response<SearchResults>> {
        self.query("/search/news", query, max).await
    }

    async fn query(
        &self,
        path: &str,
        query: &str,
        max: Option<u32>,
    ) -> Result<Response<SearchResults>> {
        let descriptor = RequestDescriptor::get(path)
            .with_query_param("q", query)
            .with_optional_query_param("max", max);
        self.client.call(descriptor).await
    }
}

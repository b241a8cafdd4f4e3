use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::{Client, RequestDescriptor, Response, Result};

/// Google Play and App Store lookups.
pub struct Apps<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStore {
    PlayStore,
    AppStore,
}

impl AppStore {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStore::PlayStore => "playStore",
            AppStore::AppStore => "appStore",
        }
    }
}

impl fmt::Display for AppStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filters shared by the search endpoints.
///
/// Unset fields are left out of the query string and the service picks its
/// own default.
#[derive(Debug, Clone, Default)]
pub struct AppSearchOptions {
    num: Option<u32>,
    country: Option<String>,
    lang: Option<String>,
}

impl AppSearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum results per store.
    pub fn num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    /// Two-letter store country, e.g. `br`.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Listing language; only the Play Store honors it.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    fn apply(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        descriptor
            .with_optional_query_param("num", self.num)
            .with_optional_query_param("country", self.country.as_deref())
            .with_optional_query_param("lang", self.lang.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub title: String,
    pub app_id: String,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    /// A number or a formatted price such as `"Free"`.
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub free: Option<bool>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Results from both stores.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSearch {
    pub query: String,
    #[serde(default)]
    pub play_store: Vec<AppSummary>,
    #[serde(default)]
    pub app_store: Vec<AppSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSearch {
    pub query: String,
    pub results: Vec<AppSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarApps {
    pub app_id: String,
    pub results: Vec<AppSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetails {
    pub title: String,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub ratings: Option<u64>,
    /// Install bucket, e.g. `"5,000,000,000+"`.
    #[serde(default)]
    pub installs: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub android_version_text: Option<String>,
    /// Epoch milliseconds or a date string, depending on the store.
    #[serde(default)]
    pub updated: Option<Value>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'a> Apps<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `GET /apps/search?q=`, both stores at once.
    pub async fn search(
        &self,
        query: &str,
        options: &AppSearchOptions,
    ) -> Result<Response<AppSearch>> {
        let descriptor =
            options.apply(RequestDescriptor::get("/apps/search").with_query_param("q", query));
        self.client.call(descriptor).await
    }

    /// `GET /apps/playstore?q=`
    pub async fn play_store(
        &self,
        query: &str,
        options: &AppSearchOptions,
    ) -> Result<Response<StoreSearch>> {
        self.store_search("/apps/playstore", query, options).await
    }

    /// `GET /apps/appstore?q=`
    pub async fn app_store(
        &self,
        query: &str,
        options: &AppSearchOptions,
    ) -> Result<Response<StoreSearch>> {
        self.store_search("/apps/appstore", query, options).await
    }

    /// `GET /apps/details?appId=&store=&country=`
    pub async fn details(
        &self,
        app_id: &str,
        store: AppStore,
        country: Option<&str>,
    ) -> Result<Response<AppDetails>> {
        let descriptor = RequestDescriptor::get("/apps/details")
            .with_query_param("appId", app_id)
            .with_query_param("store", store)
            .with_optional_query_param("country", country);
        self.client.call(descriptor).await
    }

    /// `GET /apps/similar?appId=&store=&num=`
    pub async fn similar(
        &self,
        app_id: &str,
        store: AppStore,
        num: Option<u32>,
    ) -> Result<Response<SimilarApps>> {
        let descriptor = RequestDescriptor::get("/apps/similar")
            .with_query_param("appId", app_id)
            .with_query_param("store", store)
            .with_optional_query_param("num", num);
        self.client.call(descriptor).await
    }

    async fn store_search(
        &self,
        path: &str,
        query: &str,
        options: &AppSearchOptions,
    ) -> Result<Response<StoreSearch>> {
        let descriptor = options.apply(RequestDescriptor::get(path).with_query_param("q", query));
        self.client.call(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_only_send_what_is_set() {
        let descriptor = AppSearchOptions::new()
            .num(5)
            .lang("pt")
            .apply(RequestDescriptor::get("/apps/playstore"));

        let params: Vec<_> = descriptor
            .query_params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(params, vec![("num", "5"), ("lang", "pt")]);
    }

    #[test]
    fn store_names() {
        assert_eq!(AppStore::PlayStore.to_string(), "playStore");
        assert_eq!(AppStore::AppStore.as_str(), "appStore");
    }
}

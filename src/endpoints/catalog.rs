//! The movie and series catalog.
//!
//! Ids come back as numbers from some listings and as strings from others, so
//! they are kept as raw JSON values; [`Movie::id`] and [`Series::id`] give the
//! form used in paths.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use url::Url;

use crate::{Client, RequestDescriptor, Response, Result};

/// Movies and series.
pub struct Catalog<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub category_id: Value,
    pub category_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub stream_id: Value,
    pub name: String,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn id(&self) -> String {
        id_text(&self.stream_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    pub series_id: Value,
    pub name: String,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Series {
    pub fn id(&self) -> String {
        id_text(&self.series_id)
    }
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Descriptive fields shared by movie and series details.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleInfo {
    pub name: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub info: TitleInfo,
    pub stream_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetails {
    pub info: TitleInfo,
    #[serde(default)]
    pub seasons: Vec<Value>,
    /// Episodes keyed by season number.
    #[serde(default)]
    pub episodes: BTreeMap<String, Vec<Episode>>,
}

impl SeriesDetails {
    pub fn episode_count(&self) -> usize {
        self.episodes.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    pub id: Value,
    #[serde(default)]
    pub episode_num: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "streamUrl")]
    pub stream_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `GET /filmes/categorias`
    pub async fn movie_categories(&self) -> Result<Response<Vec<Category>>> {
        self.client.get("/filmes/categorias").await
    }

    /// `GET /filmes`, optionally restricted to one category.
    pub async fn movies(&self, category_id: Option<&str>) -> Result<Response<Vec<Movie>>> {
        let descriptor = RequestDescriptor::get("/filmes")
            .with_optional_query_param("category_id", category_id);
        self.client.call(descriptor).await
    }

    /// `GET /filmes/buscar?query=`
    pub async fn search_movies(&self, query: &str) -> Result<Response<Vec<Movie>>> {
        let descriptor = RequestDescriptor::get("/filmes/buscar").with_query_param("query", query);
        self.client.call(descriptor).await
    }

    /// `GET /filmes/{id}`
    pub async fn movie(&self, stream_id: impl Display) -> Result<Response<MovieDetails>> {
        self.client.get(format!("/filmes/{}", stream_id)).await
    }

    /// `GET /series/categorias`
    pub async fn series_categories(&self) -> Result<Response<Vec<Category>>> {
        self.client.get("/series/categorias").await
    }

    /// `GET /series/buscar?query=`
    pub async fn search_series(&self, query: &str) -> Result<Response<Vec<Series>>> {
        let descriptor = RequestDescriptor::get("/series/buscar").with_query_param("query", query);
        self.client.call(descriptor).await
    }

    /// `GET /series/{id}`, with seasons and episodes.
    pub async fn series(&self, series_id: impl Display) -> Result<Response<SeriesDetails>> {
        self.client.get(format!("/series/{}", series_id)).await
    }

    /// Web player link for a movie, `{origin}/watch/{id}`.
    pub fn movie_player_url(&self, stream_id: impl Display) -> Url {
        self.player_url(&format!("/watch/{}", stream_id))
    }

    /// Web player link for a series, or one of its episodes.
    pub fn series_player_url(
        &self,
        series_id: impl Display,
        episode_id: Option<impl Display>,
    ) -> Url {
        match episode_id {
            Some(episode_id) => {
                self.player_url(&format!("/watch/series/{}/{}", series_id, episode_id))
            }
            None => self.player_url(&format!("/watch/series/{}", series_id)),
        }
    }

    // The player lives at the host root, outside the API base path.
    fn player_url(&self, path: &str) -> Url {
        let mut url = self.client.config().url().clone();
        url.set_path(path);
        url.set_query(None);
        url
    }
}

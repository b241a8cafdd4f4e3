use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::{Client, RequestDescriptor, Response, Result};

/// File host endpoints (MediaFire, Google Drive).
pub struct Files<'a> {
    client: &'a Client,
}

/// Metadata of a hosted file, including its direct link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: String,
    /// Human readable ("12.5 MB").
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    pub download_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'a> Files<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, host: &str, action: &str, url: &str) -> Result<Response<FileInfo>> {
        let descriptor =
            RequestDescriptor::get(format!("/{}/{}", host, action)).with_query_param("url", url);
        self.client.call(descriptor).await
    }

    /// `GET /mediafire/info?url=`
    pub async fn mediafire_info(&self, url: &str) -> Result<Response<FileInfo>> {
        self.fetch("mediafire", "info", url).await
    }

    /// `GET /mediafire/download?url=`
    pub async fn mediafire_download(&self, url: &str) -> Result<Response<FileInfo>> {
        self.fetch("mediafire", "download", url).await
    }

    /// `GET /gdrive/info?url=`
    pub async fn gdrive_info(&self, url: &str) -> Result<Response<FileInfo>> {
        self.fetch("gdrive", "info", url).await
    }

    /// `GET /gdrive/download?url=`
    pub async fn gdrive_download(&self, url: &str) -> Result<Response<FileInfo>> {
        self.fetch("gdrive", "download", url).await
    }

    /// URL of `/mediafire/download?redirect=true`, which answers with a redirect
    /// to the file. Requests to it still need the client's auth header.
    pub fn mediafire_redirect_url(&self, url: &str) -> Url {
        self.redirect_url("mediafire", url)
    }

    /// Google Drive counterpart of [`mediafire_redirect_url`](Self::mediafire_redirect_url).
    pub fn gdrive_redirect_url(&self, url: &str) -> Url {
        self.redirect_url("gdrive", url)
    }

    fn redirect_url(&self, host: &str, url: &str) -> Url {
        let descriptor = RequestDescriptor::get(format!("/{}/download", host))
            .with_query_param("url", url)
            .with_query_param("redirect", true);
        self.client.endpoint_url(&descriptor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{configure, Auth};

    #[test]
    fn redirect_url_keeps_base_path() {
        let client = configure("https://cog.api.br/api/v1", Auth::bearer("ck_test")).unwrap();
        let url = client
            .files()
            .gdrive_redirect_url("https://drive.google.com/file/d/1ABC/view");

        assert_eq!(url.path(), "/api/v1/gdrive/download");
        assert_eq!(
            url.query(),
            Some("url=https%3A%2F%2Fdrive.google.com%2Ffile%2Fd%2F1ABC%2Fview&redirect=true")
        );
    }
}

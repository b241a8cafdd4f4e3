use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::endpoints::{call_field, UrlBody};
use crate::{Client, RequestDescriptor, Response, Result};

/// Image processing endpoints.
pub struct Image<'a> {
    client: &'a Client,
}

/// A processed image, hosted by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResult {
    /// Link to the processed file.
    pub download: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
struct UpscaleBody<'a> {
    url: &'a str,
    scale: u8,
}

impl<'a> Image<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `POST /image/remove-bg`
    pub async fn remove_background(&self, url: &str) -> Result<Response<ImageResult>> {
        let descriptor = RequestDescriptor::post("/image/remove-bg").with_json(&UrlBody { url })?;
        call_field(self.client, descriptor, "result").await
    }

    /// `POST /image/upscale`, enlarging by `scale`.
    pub async fn upscale(&self, url: &str, scale: u8) -> Result<Response<ImageResult>> {
        let descriptor =
            RequestDescriptor::post("/image/upscale").with_json(&UpscaleBody { url, scale })?;
        call_field(self.client, descriptor, "result").await
    }
}

//! Remote favicon download over HTTP.

use std::time::Duration;

use tracing::debug;

use super::{encode_data_uri, mime_from_url, FaviconFetcher, FaviconReply, MAX_FAVICON_BYTES};
use crate::error::ViewError;

/// Downloads favicons with `reqwest` on a tokio runtime.
pub struct HttpFaviconFetcher {
    client: reqwest::Client,
    runtime: tokio::runtime::Handle,
}

impl HttpFaviconFetcher {
    pub fn new(runtime: tokio::runtime::Handle) -> Result<Self, ViewError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("Wayfarer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ViewError::Favicon(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, runtime })
    }
}

impl FaviconFetcher for HttpFaviconFetcher {
    fn fetch(&self, url: String, reply: FaviconReply) {
        let client = self.client.clone();
        self.runtime.spawn(async move {
            let result = fetch_data_uri(&client, &url).await;
            debug!(url = %url, ok = result.is_ok(), "favicon fetch finished");
            reply.send(result);
        });
    }
}

/// Download `url` and return it as a data URI.
pub async fn fetch_data_uri(client: &reqwest::Client, url: &str) -> Result<String, ViewError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ViewError::Favicon(format!("request to {url} failed: {e}")))?;

    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_string())
        .filter(|v| v.starts_with("image/"))
        .unwrap_or_else(|| mime_from_url(url).to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ViewError::Favicon(format!("reading {url} failed: {e}")))?;

    if bytes.is_empty() {
        return Err(ViewError::Favicon(format!("{url} returned an empty body")));
    }
    if bytes.len() > MAX_FAVICON_BYTES {
        return Err(ViewError::Favicon(format!(
            "{url} is {} bytes, limit is {MAX_FAVICON_BYTES}",
            bytes.len()
        )));
    }

    Ok(encode_data_uri(&mime, &bytes))
}

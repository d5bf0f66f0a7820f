use crate::core::config::ContentConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One displayable image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: String,
    pub url: String,
}

impl ImageEntry {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Trait representing anything that can hand out images for a search query.
///
/// Zero usable entries is an error ([`Error::NoResults`]), not an empty list.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_images(&self, query: &str) -> Result<Vec<ImageEntry>>;
}

/// Shared async HTTP client for the default endpoint
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent("cosmic-tarot/0.1.0")
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build reqwest async client")
});

/// Public JSON image search API
pub struct HttpContentSource {
    client: reqwest::Client,
    endpoint: String,
    images_per_query: usize,
}

impl HttpContentSource {
    /// Build a source with its own client, honouring the configured user agent
    /// and timeout
    pub fn new(config: &ContentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            images_per_query: config.images_per_query,
        })
    }

    /// Source on the shared client
    pub fn with_endpoint(endpoint: impl Into<String>, images_per_query: usize) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            endpoint: endpoint.into(),
            images_per_query,
        }
    }

    /// Fill in the endpoint template for `query`
    pub fn url_for(&self, query: &str) -> String {
        self.endpoint
            .replace("{query}", &urlencoding::encode(query))
            .replace("{count}", &self.images_per_query.to_string())
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_images(&self, query: &str) -> Result<Vec<ImageEntry>> {
        let url = self.url_for(query);
        log::debug!("fetching images for {query:?} from {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let images = images_from_response(status, &body, self.images_per_query)?;
        log::info!("query {query:?} returned {} images", images.len());
        Ok(images)
    }
}

/// Turn a finished HTTP exchange into at most `limit` images.
///
/// Non-2xx statuses become [`Error::Http`], a body without a single usable
/// entry becomes [`Error::NoResults`].
pub fn images_from_response(status: u16, body: &str, limit: usize) -> Result<Vec<ImageEntry>> {
    if !(200..300).contains(&status) {
        return Err(Error::Http(status));
    }
    let mut images = parse_images(body)?;
    images.truncate(limit);
    if images.is_empty() {
        return Err(Error::NoResults { attempts: 1 });
    }
    Ok(images)
}

/// Pull `{id, url}` pairs out of an API response.
///
/// Accepts a bare array or an object wrapping one under `results`, `data`,
/// `images` or `hits`. Entries without an id or a non-empty url are skipped.
pub fn parse_images(body: &str) -> Result<Vec<ImageEntry>> {
    let json: Value = serde_json::from_str(body)?;
    let entries = match &json {
        Value::Array(items) => items,
        Value::Object(map) => ["results", "data", "images", "hits"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| Error::Parse("response has no image list".into()))?,
        _ => return Err(Error::Parse("unexpected response shape".into())),
    };

    let images: Vec<ImageEntry> = entries.iter().filter_map(entry_from_json).collect();
    if images.len() < entries.len() {
        log::debug!("skipped {} unusable entries", entries.len() - images.len());
    }
    Ok(images)
}

fn entry_from_json(entry: &Value) -> Option<ImageEntry> {
    let id = match entry.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let url = ["url", "download_url", "image_url"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .or_else(|| entry.pointer("/urls/regular").and_then(Value::as_str))
        .filter(|url| !url.trim().is_empty())?;

    Some(ImageEntry::new(id, url))
}

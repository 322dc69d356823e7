use crate::error::{HarvestError, Result};
use reqwest::{Client, Url};
use tracing::debug;

/// The one place the harvester talks to the target site.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    base_url: Url,
}

impl SiteClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path`, with `param=page` set when a page is given.
    pub fn page_url(&self, path: &str, param: &str, page: Option<u32>) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| HarvestError::InvalidUrl(format!("{}: {}", path, e)))?;

        if let Some(page) = page {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| key != param)
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
            url.query_pairs_mut()
                .clear()
                .extend_pairs(kept)
                .append_pair(param, &page.to_string());
        }

        Ok(url)
    }

    /// Whether `url` points at the harvested site.
    pub fn is_same_site(&self, url: &Url) -> bool {
        url.scheme() == self.base_url.scheme()
            && url.host_str() == self.base_url.host_str()
            && url.port_or_known_default() == self.base_url.port_or_known_default()
    }

    pub async fn fetch_html(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(HarvestError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

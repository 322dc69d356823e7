use crate::config::SiteConfig;
use crate::domain::{PageKind, PageResult};
use crate::error::Result;
use crate::infrastructure::{Extractor, SiteClient};
use reqwest::Url;
use tracing::{info, warn};

/// Fetch plus extract for a single page.
pub struct ScrapingService {
    client: SiteClient,
    extractor: Extractor,
}

impl ScrapingService {
    pub fn new(client: SiteClient, extractor: Extractor) -> Self {
        info!("Created new Scraping service for {}", client.base_url());
        Self { client, extractor }
    }

    pub fn client(&self) -> &SiteClient {
        &self.client
    }

    pub fn site(&self) -> &SiteConfig {
        self.extractor.site()
    }

    /// URL of a listing page; page 1 is requested without the page parameter.
    pub fn listing_url(&self, path: &str, page: u32) -> Result<Url> {
        let page = (page > 1).then_some(page);
        self.client.page_url(path, &self.site().page_param, page)
    }

    /// Scrapes one page, reporting fetch failures to the caller.
    pub async fn try_scrape_page(&self, url: &Url, kind: PageKind) -> Result<PageResult> {
        let html = self.client.fetch_html(url).await?;
        Ok(self.extractor.extract(&html, kind, url.as_str()))
    }

    /// Scrapes one page. A page that cannot be fetched counts as empty so a
    /// single bad page never sinks the run.
    pub async fn scrape_page(&self, url: &Url, kind: PageKind) -> PageResult {
        match self.try_scrape_page(url, kind).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Treating {} as empty: {}", url, e);
                PageResult::empty()
            }
        }
    }
}

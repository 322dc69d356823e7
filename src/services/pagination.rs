use crate::domain::{PageKind, PageResult, ProfileRecord};
use crate::services::scraping::ScrapingService;
use rustc_hash::FxHashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Walks numbered project listings and the profile sources of the site.
pub struct Paginator {
    scraping: ScrapingService,
    max_pages: usize,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(scraping: ScrapingService, max_pages: usize, page_delay: Duration) -> Self {
        Self {
            scraping,
            max_pages: max_pages.max(1),
            page_delay,
        }
    }

    pub fn scraping(&self) -> &ScrapingService {
        &self.scraping
    }

    /// Fetches page 1, 2, ... of the listing at `listing_path` and returns
    /// every page before the first one that is empty or carries the
    /// end-of-results marker. That terminating page is not included, and an
    /// empty first page means no projects at all.
    pub async fn traverse_project_pages(&self, listing_path: &str) -> Vec<PageResult> {
        let mut pages = Vec::new();

        for page_number in 1.. {
            if page_number as usize > self.max_pages {
                warn!(
                    "Stopping {} after {} pages without reaching an empty page",
                    listing_path, self.max_pages
                );
                break;
            }

            let url = match self.scraping.listing_url(listing_path, page_number) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Cannot build URL for page {}: {}", page_number, e);
                    break;
                }
            };

            if page_number > 1 && !self.page_delay.is_zero() {
                sleep(self.page_delay).await;
            }

            let page = self.scraping.scrape_page(&url, PageKind::Projects).await;
            info!("Page {}: {} projects found", page_number, page.projects.len());

            if page.ends_listing() {
                if page_number == 1 {
                    info!("No projects on the first page of {}", listing_path);
                } else {
                    info!("Listing ended at page {}", page_number);
                }
                break;
            }
            pages.push(page);
        }

        pages
    }

    /// Profiles from the canonical listing. When it has none, the generic
    /// page and the profiles embedded in the project listing are tried
    /// instead, the latter contributing only handles not seen yet.
    pub async fn discover_profiles(&self) -> Vec<ProfileRecord> {
        let site = self.scraping.site();

        let mut profiles = self.profiles_at(&site.profiles_path, PageKind::Profiles).await;
        if !profiles.is_empty() {
            info!("{} profiles found on {}", profiles.len(), site.profiles_path);
            return profiles;
        }

        info!("No profiles on {}, trying fallback sources", site.profiles_path);
        let (generic, embedded) = tokio::join!(
            self.profiles_at(&site.fallback_profiles_path, PageKind::Profiles),
            self.profiles_at(&site.projects_path, PageKind::Projects),
        );

        let from_generic = merge_new_handles(&mut profiles, generic);
        info!(
            "{} profiles found on {}",
            from_generic, site.fallback_profiles_path
        );
        let from_listing = merge_new_handles(&mut profiles, embedded);
        info!("{} profiles found on {}", from_listing, site.projects_path);

        profiles
    }

    async fn profiles_at(&self, path: &str, kind: PageKind) -> Vec<ProfileRecord> {
        match self.scraping.listing_url(path, 1) {
            Ok(url) => self.scraping.scrape_page(&url, kind).await.profiles,
            Err(e) => {
                warn!("Skipping profile source {}: {}", path, e);
                Vec::new()
            }
        }
    }
}

/// Appends the profiles of `extra` whose handle is not in `profiles` yet.
/// Returns how many were added.
pub fn merge_new_handles(profiles: &mut Vec<ProfileRecord>, extra: Vec<ProfileRecord>) -> usize {
    let mut seen: FxHashSet<String> = profiles.iter().map(|p| p.handle.clone()).collect();
    let before = profiles.len();

    for profile in extra {
        if seen.insert(profile.handle.clone()) {
            profiles.push(profile);
        }
    }

    profiles.len() - before
}

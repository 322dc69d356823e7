//! Pagination hints scraped from project listings.
//!
//! None of these are trusted to end a traversal on their own: the total page
//! count comes from whatever the last pagination link happens to say, so the
//! paginator stops on an empty page or the end-of-results marker instead.

use super::text_of;
use crate::utils::clean_text;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};

static PAGINATION_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".pagination a").unwrap());

/// Page number requested through the `param` query parameter, 1 when absent
/// or unreadable.
pub fn current_page(url: &str, param: &str) -> u32 {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == param)
                .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        })
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Page number embedded in the last pagination link, 1 when the page has no
/// pagination control.
pub fn total_pages(document: &Html, param: &str) -> u32 {
    let Ok(pattern) = Regex::new(&format!(r"(?:^|[?&]){}=(\d+)", regex::escape(param))) else {
        return 1;
    };

    document
        .select(&PAGINATION_LINK)
        .last()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| pattern.captures(href))
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|pages| *pages >= 1)
        .unwrap_or(1)
}

/// Whether the page body announces zero results.
pub fn has_end_marker(document: &Html, marker: &str) -> bool {
    let marker = clean_text(marker);
    if marker.is_empty() {
        return false;
    }
    text_of(document.root_element()).contains(&marker)
}

use crate::config::SiteConfig;
use crate::domain::{PageKind, PageResult, Pagination, ProfileRecord, ProjectRecord};
use crate::utils::clean_text;
use scraper::{ElementRef, Html, Selector};
use std::fmt::Debug;
use tracing::debug;

pub(crate) mod pagination;
pub(crate) mod profiles;
pub(crate) mod projects;

pub use profiles::ProfileStrategy;
pub use projects::ProjectStrategy;

/// Turns fetched HTML into records. Never fails: markup it cannot read
/// yields empty sequences.
#[derive(Debug, Clone)]
pub struct Extractor {
    site: SiteConfig,
}

impl Extractor {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Extracts one page. Project listings also report their embedded
    /// profiles, the end-of-results marker and pagination metadata; `url`
    /// is the address the page was requested from.
    pub fn extract(&self, html: &str, kind: PageKind, url: &str) -> PageResult {
        let document = Html::parse_document(html);

        match kind {
            PageKind::Profiles => PageResult {
                profiles: self.extract_profiles(&document),
                ..PageResult::empty()
            },
            PageKind::Projects => {
                let profiles = self.extract_embedded_profiles(&document);
                let end_marker = pagination::has_end_marker(&document, &self.site.end_marker);
                let projects = if end_marker {
                    debug!("End-of-results marker found on {}", url);
                    Vec::new()
                } else {
                    self.extract_projects(&document)
                };

                PageResult {
                    profiles,
                    pagination: Pagination {
                        current_page: pagination::current_page(url, &self.site.page_param),
                        total_pages: pagination::total_pages(&document, &self.site.page_param),
                        count_on_page: projects.len(),
                    },
                    projects,
                    end_marker,
                }
            }
        }
    }

    pub fn extract_profiles(&self, document: &Html) -> Vec<ProfileRecord> {
        first_non_empty(&ProfileStrategy::ORDER, |strategy| {
            strategy.apply(document, &self.site)
        })
    }

    /// Profile cards embedded in a project listing. Tables and lists on
    /// such a page are left to the project strategies.
    pub fn extract_embedded_profiles(&self, document: &Html) -> Vec<ProfileRecord> {
        first_non_empty(&ProfileStrategy::EMBEDDED, |strategy| {
            strategy.apply(document, &self.site)
        })
    }

    pub fn extract_projects(&self, document: &Html) -> Vec<ProjectRecord> {
        first_non_empty(&ProjectStrategy::ORDER, |strategy| {
            strategy.apply(document, &self.site)
        })
    }
}

/// Tries each strategy in order and keeps the first non-empty result.
fn first_non_empty<S, T>(strategies: &[S], apply: impl Fn(S) -> Vec<T>) -> Vec<T>
where
    S: Copy + Debug,
{
    for &strategy in strategies {
        let records = apply(strategy);
        if !records.is_empty() {
            debug!("{:?} matched {} records", strategy, records.len());
            return records;
        }
    }
    Vec::new()
}

pub(crate) fn text_of(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first descendant matching `selector`, empty when none does.
pub(crate) fn first_text(element: ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(text_of)
        .unwrap_or_default()
}

pub(crate) fn first_attr(element: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .find_map(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Text of the first child node, whether a bare text node or an element.
pub(crate) fn first_child_text(element: ElementRef) -> String {
    let Some(node) = element.first_child() else {
        return String::new();
    };
    if let Some(text) = node.value().as_text() {
        return clean_text(text);
    }
    ElementRef::wrap(node).map(text_of).unwrap_or_default()
}

pub(crate) fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && text.contains(keyword.as_str()))
}

/// Cells of every table row that has at least two `td` cells.
pub(crate) fn table_rows(document: &Html) -> Vec<Vec<String>> {
    use once_cell::sync::Lazy;
    static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("table tr").unwrap());
    static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

    document
        .select(&ROW)
        .map(|row| row.select(&CELL).map(text_of).collect::<Vec<_>>())
        .filter(|cells| cells.len() >= 2)
        .collect()
}

use super::{contains_keyword, first_attr, first_text, table_rows, text_of};
use crate::config::SiteConfig;
use crate::domain::ProfileRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static MEMBER_CARD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".team-member-card, .developer-card, .user-card, .member-card, .team-member")
        .unwrap()
});
static CARD_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".name, .user-name, h2, h3, h4, .title").unwrap());
static CARD_HANDLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".username, .user-handle, .handle, .user-id").unwrap());
static CARD_ROLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".role, .position, .user-role, .text-muted-foreground.capitalize, .title")
        .unwrap()
});
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

static OVERLAY_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".relative.h-full.flex.flex-col.justify-end.p-6.z-30").unwrap());
static OVERLAY_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static MUTED_CAPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".text-muted-foreground.capitalize").unwrap());

static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("ul li, ol li").unwrap());
static HANDLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^@]*?)\s*@(\S+)(?:\s+(.+))?$").unwrap());

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStrategy {
    /// Cards classed as member/developer/user cards.
    StructuralCard,
    /// The overlay card layout, handle in a heading and role in a muted caption.
    SemanticContainer,
    Table,
    /// `name @handle (role)` list items.
    List,
    /// `Name (Role)` links under the all-developers heading.
    DirectoryLinks,
}

impl ProfileStrategy {
    pub const ORDER: [Self; 5] = [
        Self::StructuralCard,
        Self::SemanticContainer,
        Self::Table,
        Self::List,
        Self::DirectoryLinks,
    ];

    /// Strategies safe to run on a project listing, where tables and lists
    /// hold projects rather than people.
    pub const EMBEDDED: [Self; 3] = [
        Self::StructuralCard,
        Self::SemanticContainer,
        Self::DirectoryLinks,
    ];

    pub fn apply(self, document: &Html, site: &SiteConfig) -> Vec<ProfileRecord> {
        match self {
            Self::StructuralCard => structural_cards(document),
            Self::SemanticContainer => semantic_containers(document),
            Self::Table => table_rows_as_profiles(document, &site.profile_header_keywords),
            Self::List => handle_lines(document),
            Self::DirectoryLinks => directory_links(document, &site.directory_heading),
        }
    }
}

fn structural_cards(document: &Html) -> Vec<ProfileRecord> {
    document
        .select(&MEMBER_CARD)
        .filter_map(|card| {
            ProfileRecord::from_parts(
                first_text(card, &CARD_NAME).trim_start_matches('@'),
                &first_text(card, &CARD_HANDLE),
                &first_text(card, &CARD_ROLE),
                first_attr(card, &IMAGE, "src"),
            )
        })
        .collect()
}

fn semantic_containers(document: &Html) -> Vec<ProfileRecord> {
    document
        .select(&OVERLAY_CARD)
        .filter_map(|card| {
            let handle = first_text(card, &OVERLAY_HEADING);
            ProfileRecord::from_parts(
                handle.trim_start_matches('@'),
                &handle,
                &first_text(card, &MUTED_CAPTION),
                first_attr(card, &IMAGE, "src"),
            )
        })
        .collect()
}

fn table_rows_as_profiles(document: &Html, header_keywords: &[String]) -> Vec<ProfileRecord> {
    table_rows(document)
        .into_iter()
        .filter(|cells| {
            !contains_keyword(&cells[0], header_keywords)
                && !contains_keyword(&cells[1], header_keywords)
        })
        .filter_map(|cells| {
            let role = cells.get(2).map(String::as_str).unwrap_or_default();
            ProfileRecord::from_parts(&cells[0], &cells[1], role, None)
        })
        .collect()
}

fn handle_lines(document: &Html) -> Vec<ProfileRecord> {
    document
        .select(&LIST_ITEM)
        .filter_map(|item| {
            let text = text_of(item);
            let caps = HANDLE_LINE.captures(&text)?;
            let role = caps
                .get(3)
                .map(|m| m.as_str().trim_start_matches('(').trim_end_matches(')'))
                .unwrap_or_default();
            ProfileRecord::from_parts(&caps[1], &caps[2], role, None)
        })
        .collect()
}

fn directory_links(document: &Html, heading_text: &str) -> Vec<ProfileRecord> {
    if heading_text.is_empty() {
        return Vec::new();
    }

    document
        .select(&HEADING)
        .filter(|heading| text_of(*heading).contains(heading_text))
        .filter_map(|heading| heading.next_siblings().find_map(ElementRef::wrap))
        .flat_map(|list| list.select(&LINK).map(text_of).collect::<Vec<_>>())
        .filter(|text| !text.is_empty() && text != heading_text)
        .filter_map(|text| {
            let (name, role) = match text.split_once('(') {
                Some((name, rest)) => (name, rest.trim_end().trim_end_matches(')')),
                None => (text.as_str(), ""),
            };
            ProfileRecord::from_parts(name, "", role, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: ProfileStrategy, html: &str) -> Vec<ProfileRecord> {
        strategy.apply(&Html::parse_document(html), &SiteConfig::default())
    }

    #[test]
    fn structural_card_reads_name_handle_role_and_avatar() {
        let html = r#"
            <div class="developer-card">
                <img src="/avatars/ali.png">
                <h3>Ali Veli</h3>
                <span class="handle">@AliV</span>
                <span class="role">Backend</span>
            </div>"#;
        let profiles = run(ProfileStrategy::StructuralCard, html);

        assert_eq!(
            profiles,
            vec![ProfileRecord {
                display_name: "Ali Veli".to_string(),
                handle: "aliv".to_string(),
                role: "Backend".to_string(),
                avatar_url: Some("/avatars/ali.png".to_string()),
            }]
        );
    }

    #[test]
    fn structural_card_without_handle_derives_it() {
        let html = r#"<div class="team-member"><span class="name">Zeynep Kaya</span></div>"#;
        let profiles = run(ProfileStrategy::StructuralCard, html);
        assert_eq!(profiles[0].handle, "zeynepkaya");
        assert_eq!(profiles[0].role, "");
    }

    #[test]
    fn semantic_container_takes_handle_from_heading() {
        let html = r#"
            <div class="relative h-full flex flex-col justify-end p-6 z-30">
                <h2>@setdev</h2>
                <p class="text-muted-foreground capitalize">kurucu</p>
            </div>"#;
        let profiles = run(ProfileStrategy::SemanticContainer, html);

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].handle, "setdev");
        assert_eq!(profiles[0].display_name, "setdev");
        assert_eq!(profiles[0].role, "kurucu");
    }

    #[test]
    fn table_skips_header_rows() {
        let html = r#"
            <table>
                <tr><td>İsim</td><td>Kullanıcı Adı</td></tr>
                <tr><td>Ali</td><td>ali1</td></tr>
            </table>"#;
        let profiles = run(ProfileStrategy::Table, html);

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].display_name, "Ali");
        assert_eq!(profiles[0].handle, "ali1");
    }

    #[test]
    fn list_items_follow_the_handle_pattern() {
        let html = r#"
            <ul>
                <li>Ayşe @ayse (Tasarımcı)</li>
                <li>no handle here</li>
                <li>@solo</li>
            </ul>"#;
        let profiles = run(ProfileStrategy::List, html);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].display_name, "Ayşe");
        assert_eq!(profiles[0].handle, "ayse");
        assert_eq!(profiles[0].role, "Tasarımcı");
        assert_eq!(profiles[1].display_name, "solo");
    }

    #[test]
    fn directory_links_split_name_and_role() {
        let html = r#"
            <h2>Tüm Geliştiriciler</h2>
            <div><a href="/u/1">Mert Can (Moderatör)</a><a href="/u/2">Deniz</a></div>"#;
        let profiles = run(ProfileStrategy::DirectoryLinks, html);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].display_name, "Mert Can");
        assert_eq!(profiles[0].handle, "mertcan");
        assert_eq!(profiles[0].role, "Moderatör");
        assert_eq!(profiles[1].role, "");
    }
}

use super::{contains_keyword, first_attr, first_child_text, first_text, table_rows, text_of};
use crate::config::SiteConfig;
use crate::domain::ProjectRecord;
use crate::utils::clean_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ANCHOR_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.group.relative.overflow-hidden.rounded-lg, a.card").unwrap());
static ANCHOR_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static ANCHOR_CAPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.text-sm.text-muted-foreground").unwrap());

static GENERIC_CARD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".project-card, .code-card, .card, .project, .code-item").unwrap()
});
static GENERIC_NAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".project-name, .code-name, h3, h4, .title, .name").unwrap()
});
static GENERIC_DESCRIPTION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".project-description, .code-description, p, .description, .details").unwrap()
});

static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("ul li, ol li").unwrap());
static LIST_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("strong, b, .name, .title").unwrap());
static LIST_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, .description").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStrategy {
    /// Whole-card anchors: the card itself is the link.
    AnchorCard,
    GenericCard,
    Table,
    List,
}

impl ProjectStrategy {
    pub const ORDER: [Self; 4] = [Self::AnchorCard, Self::GenericCard, Self::Table, Self::List];

    pub fn apply(self, document: &Html, site: &SiteConfig) -> Vec<ProjectRecord> {
        match self {
            Self::AnchorCard => anchor_cards(document),
            Self::GenericCard => generic_cards(document),
            Self::Table => table_rows_as_projects(document, &site.project_header_keywords),
            Self::List => list_items(document, &site.project_header_keywords),
        }
    }
}

fn own_href(element: ElementRef) -> Option<String> {
    element
        .value()
        .attr("href")
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

fn anchor_cards(document: &Html) -> Vec<ProjectRecord> {
    document
        .select(&ANCHOR_CARD)
        .filter_map(|card| {
            ProjectRecord::from_parts(
                &first_text(card, &ANCHOR_TITLE),
                &first_text(card, &ANCHOR_CAPTION),
                first_attr(card, &IMAGE, "src"),
                own_href(card),
            )
        })
        .collect()
}

fn generic_cards(document: &Html) -> Vec<ProjectRecord> {
    document
        .select(&GENERIC_CARD)
        .filter_map(|card| {
            let link = own_href(card).or_else(|| first_attr(card, &LINK, "href"));
            ProjectRecord::from_parts(
                &first_text(card, &GENERIC_NAME),
                &first_text(card, &GENERIC_DESCRIPTION),
                first_attr(card, &IMAGE, "src"),
                link,
            )
        })
        .collect()
}

fn table_rows_as_projects(document: &Html, header_keywords: &[String]) -> Vec<ProjectRecord> {
    table_rows(document)
        .into_iter()
        .filter(|cells| !contains_keyword(&cells[0], header_keywords))
        .filter_map(|cells| ProjectRecord::from_parts(&cells[0], &cells[1], None, None))
        .collect()
}

fn list_items(document: &Html, header_keywords: &[String]) -> Vec<ProjectRecord> {
    document
        .select(&LIST_ITEM)
        .filter_map(|item| {
            let mut name = first_text(item, &LIST_NAME);
            if name.is_empty() {
                name = first_child_text(item);
            }
            if contains_keyword(&name, header_keywords) {
                return None;
            }

            let mut description = first_text(item, &LIST_DESCRIPTION);
            if description.is_empty() {
                let full = text_of(item);
                description = clean_text(full.strip_prefix(name.as_str()).unwrap_or(&full));
            }

            ProjectRecord::from_parts(
                &name,
                &description,
                first_attr(item, &IMAGE, "src"),
                first_attr(item, &LINK, "href"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: ProjectStrategy, html: &str) -> Vec<ProjectRecord> {
        strategy.apply(&Html::parse_document(html), &SiteConfig::default())
    }

    #[test]
    fn anchor_card_links_to_itself() {
        let html = r#"
            <a class="group relative overflow-hidden rounded-lg" href="/kodlar/discord-bot">
                <img src="/img/bot.png">
                <h3>Discord Bot</h3>
                <p class="text-sm text-muted-foreground">Moderasyon botu</p>
            </a>"#;
        let projects = run(ProjectStrategy::AnchorCard, html);

        assert_eq!(
            projects,
            vec![ProjectRecord {
                name: "Discord Bot".to_string(),
                description: "Moderasyon botu".to_string(),
                image_url: Some("/img/bot.png".to_string()),
                link: Some("/kodlar/discord-bot".to_string()),
            }]
        );
    }

    #[test]
    fn generic_card_without_name_is_discarded() {
        let html = r#"
            <div class="code-card"><h4>Site Şablonu</h4><a href="/x">detay</a></div>
            <div class="code-card"><p>only a caption</p></div>"#;
        let projects = run(ProjectStrategy::GenericCard, html);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Site Şablonu");
        assert_eq!(projects[0].link.as_deref(), Some("/x"));
    }

    #[test]
    fn table_treats_cells_as_name_and_description() {
        let html = r#"
            <table>
                <tr><td>Proje</td><td>Açıklama</td></tr>
                <tr><td>Panel</td><td>Yönetim paneli</td></tr>
                <tr><td>Tek hücre</td></tr>
            </table>"#;
        let projects = run(ProjectStrategy::Table, html);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Panel");
        assert_eq!(projects[0].description, "Yönetim paneli");
    }

    #[test]
    fn list_items_use_bold_name_or_first_child() {
        let html = r#"
            <ul>
                <li><strong>Oyun Modu</strong> hızlı eğlence</li>
                <li>Müzik Botu<p>YouTube desteği</p></li>
                <li><b>Proje listesi</b></li>
            </ul>"#;
        let projects = run(ProjectStrategy::List, html);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Oyun Modu");
        assert_eq!(projects[0].description, "hızlı eğlence");
        assert_eq!(projects[1].name, "Müzik Botu");
        assert_eq!(projects[1].description, "YouTube desteği");
    }
}

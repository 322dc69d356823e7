use serde::{Deserialize, Serialize};

/// Which listing a fetched document is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Profiles,
    Projects,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub display_name: String,
    /// Dedup key: lowercase, never empty, no leading `@`.
    pub handle: String,
    #[serde(default)]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileRecord {
    /// Builds a record from whatever the markup offered. Name and handle
    /// stand in for each other; returns `None` when both are blank.
    pub fn from_parts(
        name: &str,
        handle: &str,
        role: &str,
        avatar_url: Option<String>,
    ) -> Option<Self> {
        let name = crate::utils::clean_text(name);
        let shown_handle = crate::utils::clean_text(handle.trim().trim_start_matches('@'));
        let handle = crate::utils::normalize_handle(handle);

        let (display_name, handle) = match (name.is_empty(), handle.is_empty()) {
            (true, true) => return None,
            (true, false) => (shown_handle, handle),
            (false, true) => {
                let derived = crate::utils::derive_handle(&name);
                (name, derived)
            }
            (false, false) => (name, handle),
        };
        if handle.is_empty() {
            return None;
        }

        Some(Self {
            display_name,
            handle,
            role: crate::utils::clean_text(role),
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Dedup key, never empty.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ProjectRecord {
    pub fn from_parts(
        name: &str,
        description: &str,
        image_url: Option<String>,
        link: Option<String>,
    ) -> Option<Self> {
        let name = crate::utils::clean_text(name);
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            description: crate::utils::clean_text(description),
            image_url: image_url.filter(|url| !url.trim().is_empty()),
            link: link.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub count_on_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            count_on_page: 0,
        }
    }
}

/// Everything extracted from one fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub profiles: Vec<ProfileRecord>,
    pub projects: Vec<ProjectRecord>,
    pub pagination: Pagination,
    /// The page announced that it holds zero results.
    #[serde(default)]
    pub end_marker: bool,
}

impl PageResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when this page ends a project listing traversal.
    pub fn ends_listing(&self) -> bool {
        self.end_marker || self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_without_handle_derives_one_from_the_name() {
        let profile = ProfileRecord::from_parts("Ayşe Demir", "", "Developer", None).unwrap();
        assert_eq!(profile.display_name, "Ayşe Demir");
        assert_eq!(profile.handle, "ayşedemir");
    }

    #[test]
    fn profile_without_name_uses_the_handle() {
        let profile = ProfileRecord::from_parts("  ", "@Mehmet", "", None).unwrap();
        assert_eq!(profile.display_name, "Mehmet");
        assert_eq!(profile.handle, "mehmet");
    }

    #[test]
    fn blank_profile_is_rejected() {
        assert!(ProfileRecord::from_parts("", "@", "Admin", None).is_none());
    }

    #[test]
    fn project_requires_a_name() {
        assert!(ProjectRecord::from_parts(" \n ", "desc", None, None).is_none());
        let project = ProjectRecord::from_parts("Bot", "", None, Some(String::new())).unwrap();
        assert_eq!(project.link, None);
    }

    #[test]
    fn records_serialize_in_camel_case_without_absent_fields() {
        let profile = ProfileRecord::from_parts("Ali", "ali1", "", None).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["displayName"], "Ali");
        assert!(json.get("avatarUrl").is_none());
    }
}

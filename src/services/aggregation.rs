use crate::domain::{PageResult, ProfileRecord, ProjectRecord, RunSnapshot};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use std::hash::Hash;
use tracing::info;

/// Merges one run's profiles and project pages into a snapshot stamped now.
pub fn aggregate(profiles: Vec<ProfileRecord>, pages: Vec<PageResult>) -> RunSnapshot {
    aggregate_at(profiles, pages, Utc::now())
}

pub fn aggregate_at(
    profiles: Vec<ProfileRecord>,
    pages: Vec<PageResult>,
    timestamp: DateTime<Utc>,
) -> RunSnapshot {
    let scraped = pages.iter().map(|page| page.projects.len()).sum::<usize>();
    let projects = dedup_projects(pages.into_iter().flat_map(|page| page.projects).collect());
    let profiles = dedup_profiles(profiles);

    info!(
        "Aggregated {} profiles and {} unique projects ({} scraped)",
        profiles.len(),
        projects.len(),
        scraped
    );

    RunSnapshot::new(timestamp, profiles, projects)
}

/// First occurrence of each project name, in input order.
pub fn dedup_projects(projects: Vec<ProjectRecord>) -> Vec<ProjectRecord> {
    dedup_by_key(projects, |project| project.name.clone())
}

/// First occurrence of each handle, in input order.
pub fn dedup_profiles(profiles: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
    dedup_by_key(profiles, |profile| profile.handle.clone())
}

fn dedup_by_key<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

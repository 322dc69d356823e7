use super::{ProfileRecord, ProjectRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deduplicated, timestamped result of a full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub timestamp: DateTime<Utc>,
    pub profile_count: usize,
    pub project_count: usize,
    pub profiles: Vec<ProfileRecord>,
    pub projects: Vec<ProjectRecord>,
}

impl RunSnapshot {
    pub fn new(
        timestamp: DateTime<Utc>,
        profiles: Vec<ProfileRecord>,
        projects: Vec<ProjectRecord>,
    ) -> Self {
        Self {
            timestamp,
            profile_count: profiles.len(),
            project_count: projects.len(),
            profiles,
            projects,
        }
    }

    pub fn point(&self) -> TimeSeriesPoint {
        TimeSeriesPoint {
            timestamp: self.timestamp,
            profile_count: self.profile_count,
            project_count: self.project_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub profile_count: usize,
    pub project_count: usize,
}

/// Snapshots in chronological order, oldest first.
pub type History = Vec<RunSnapshot>;

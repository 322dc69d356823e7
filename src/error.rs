use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("A harvest run is already in progress")]
    RunInProgress,
    #[error("Harvest run exceeded {0}s and was abandoned")]
    Timeout(u64),
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;

use crate::config::cli::Args;
use crate::error::{HarvestError, Result};
use clap::Parser;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod cli;

/// Where things live on the harvested site and how its markup reads.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub profiles_path: String,
    pub fallback_profiles_path: String,
    pub projects_path: String,
    pub page_param: String,
    pub end_marker: String,
    pub profile_header_keywords: Vec<String>,
    pub project_header_keywords: Vec<String>,
    pub directory_heading: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            profiles_path: "/developers".to_string(),
            fallback_profiles_path: "/".to_string(),
            projects_path: "/kodlar".to_string(),
            page_param: "page".to_string(),
            end_marker: "Toplam 0 proje bulundu".to_string(),
            profile_header_keywords: vec!["İsim".to_string(), "Kullanıcı".to_string()],
            project_header_keywords: vec!["Proje".to_string(), "İsim".to_string()],
            directory_heading: "Tüm Geliştiriciler".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

pub struct Config {
    pub args: Args,
    pub site: SiteConfig,
    pub base_url: Url,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let site = match &args.site_config {
            Some(path) => SiteConfig::load(path)?,
            None => SiteConfig::default(),
        };

        let base_url = Url::parse(&args.base_url)
            .map_err(|e| HarvestError::InvalidUrl(format!("{}: {}", args.base_url, e)))?;
        if base_url.host_str().is_none() {
            return Err(HarvestError::InvalidUrl(format!(
                "{}: base URL has no host",
                args.base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(args.request_timeout_secs))
            .user_agent(args.user_agent.as_str())
            .build()?;

        Ok(Self {
            args,
            site,
            base_url,
            http_client,
        })
    }

    /// Absolute URL for a path on the harvested site.
    pub fn site_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| HarvestError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Data dir {} exists", self.args.data_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["siteharvest"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_run_every_ten_minutes_and_keep_a_hundred_snapshots() {
        let args = args(&[]);
        assert_eq!(args.interval_secs, 600);
        assert_eq!(args.history_limit, 100);
        assert!(args.command.is_none());
    }

    #[test]
    fn site_url_joins_paths_onto_the_origin() {
        let config = Config::from_args(args(&["--base-url", "https://example.com"])).unwrap();
        assert_eq!(
            config.site_url("/kodlar").unwrap().as_str(),
            "https://example.com/kodlar"
        );
    }

    #[test]
    fn rejects_a_base_url_that_does_not_parse() {
        let result = Config::from_args(args(&["--base-url", "not a url"]));
        assert!(matches!(result, Err(HarvestError::InvalidUrl(_))));
    }

    #[test]
    fn site_config_fills_missing_fields_with_defaults() {
        let site: SiteConfig =
            serde_json::from_str(r#"{"projectsPath": "/projects", "endMarker": "No results"}"#)
                .unwrap();
        assert_eq!(site.projects_path, "/projects");
        assert_eq!(site.end_marker, "No results");
        assert_eq!(site.profiles_path, "/developers");
        assert_eq!(site.page_param, "page");
    }

    #[test]
    fn site_config_is_read_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"profilesPath": "/team"}"#).unwrap();

        let config = Config::from_args(args(&[
            "--site-config",
            path.to_str().unwrap(),
        ]))
        .unwrap();
        assert_eq!(config.site.profiles_path, "/team");
    }
}

//! Report artifacts on disk

use super::aggregator::RunReport;
use super::render::{render_csv, render_json};
use crate::utils::error::Result;
use crate::utils::sanitize_file_component;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the two artifacts of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Writes `cleanup_<account>_<timestamp>.{csv,json}` into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Both paths for a report, without touching the filesystem
    pub fn paths_for(&self, report: &RunReport) -> ReportPaths {
        let stem = format!(
            "cleanup_{}_{}",
            sanitize_file_component(&report.account_name),
            report.timestamp
        );
        ReportPaths {
            csv: self.directory.join(format!("{}.csv", stem)),
            json: self.directory.join(format!("{}.json", stem)),
        }
    }

    /// Render both forms and write them, creating the directory if needed
    pub async fn write(&self, report: &RunReport) -> Result<ReportPaths> {
        let paths = self.paths_for(report);
        let csv = render_csv(report);
        let json = render_json(report)?;

        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(&paths.csv, csv).await?;
        info!("CSV report saved: {}", paths.csv.display());
        tokio::fs::write(&paths.json, json).await?;
        info!("JSON report saved: {}", paths.json.display());

        Ok(paths)
    }
}

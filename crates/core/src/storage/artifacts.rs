use crate::domain::DailyAnalysis;
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "analysis-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub html: PathBuf,
}

impl ArtifactPaths {
    pub fn for_date(dir: &Path, run_date: NaiveDate) -> Self {
        let stem = format!("{FILE_PREFIX}{}", run_date.format("%Y-%m-%d"));
        Self {
            json: dir.join(format!("{stem}.json")),
            html: dir.join(format!("{stem}.html")),
        }
    }
}

/// Writes the pretty-printed JSON snapshot and the HTML report for `run_date`.
/// Same-day reruns overwrite.
pub async fn write_artifacts(
    dir: &Path,
    run_date: NaiveDate,
    analysis: &DailyAnalysis,
    html: &str,
) -> anyhow::Result<ArtifactPaths> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let paths = ArtifactPaths::for_date(dir, run_date);
    let json = serde_json::to_string_pretty(analysis).context("failed to serialize analysis")?;

    tokio::fs::write(&paths.json, json)
        .await
        .with_context(|| format!("failed to write {}", paths.json.display()))?;
    tokio::fs::write(&paths.html, html)
        .await
        .with_context(|| format!("failed to write {}", paths.html.display()))?;

    Ok(paths)
}

pub async fn load_analysis(path: &Path) -> anyhow::Result<DailyAnalysis> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid analysis JSON in {}", path.display()))
}

/// Paths for `run_date`, only if the JSON artifact exists.
pub async fn artifact_for_date(
    dir: &Path,
    run_date: NaiveDate,
) -> anyhow::Result<Option<ArtifactPaths>> {
    let paths = ArtifactPaths::for_date(dir, run_date);
    let exists = tokio::fs::try_exists(&paths.json)
        .await
        .with_context(|| format!("failed to stat {}", paths.json.display()))?;
    Ok(exists.then_some(paths))
}

/// Newest dated JSON artifact in `dir`, by the date in its file name.
pub async fn latest_artifact(dir: &Path) -> anyhow::Result<Option<(NaiveDate, ArtifactPaths)>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to list {}", dir.display()));
        }
    };

    let mut latest: Option<NaiveDate> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to list {}", dir.display()))?
    {
        let name = entry.file_name();
        let Some(date) = name.to_str().and_then(date_from_file_name) else {
            continue;
        };
        if latest.map_or(true, |d| date > d) {
            latest = Some(date);
        }
    }

    Ok(latest.map(|d| (d, ArtifactPaths::for_date(dir, d))))
}

fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

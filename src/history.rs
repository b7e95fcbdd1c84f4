//! Trend tracking - persist risk scores to .postcheck-history.json

use crate::{FileReport, RiskLevel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILENAME: &str = ".postcheck-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    pub files: HashMap<String, FileScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileScore {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub flags: usize,
    /// SHA-256 of the content that produced this score
    #[serde(default)]
    pub digest: String,
}

/// SHA-256 of `content`, lowercase hex
pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Find project root (directory containing the history file, a config, or .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    start
        .ancestors()
        .find(|dir| {
            dir.join(HISTORY_FILENAME).exists()
                || dir.join(crate::config::CONFIG_FILENAME).exists()
                || dir.join(".git").exists()
        })
        .map(Path::to_path_buf)
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    let Ok(content) = fs::read_to_string(&path) else {
        return HistoryFile::default();
    };
    match serde_json::from_str::<HistoryFile>(&content) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("ignoring unreadable history {}: {}", path.display(), e);
            HistoryFile::default()
        }
    }
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).map_err(std::io::Error::other)?;
    fs::write(path, content)
}

/// The latest recorded entry for a file
pub fn previous_entry<'a>(history: &'a HistoryFile, file_path: &Path) -> Option<&'a FileScore> {
    let run = history.runs.last()?;
    run.files.get(file_path.to_string_lossy().as_ref())
}

/// Get the previous risk score for a file from the latest run
pub fn previous_score(history: &HistoryFile, file_path: &Path) -> Option<u8> {
    previous_entry(history, file_path).map(|f| f.risk_score)
}

/// Quiet-mode suffix for a report. Same digest as last run means the text itself did not change.
pub fn report_delta(history: &HistoryFile, report: &FileReport) -> String {
    let Some(prev) = previous_entry(history, &report.file_path) else {
        return String::new();
    };
    let current = report.result.risk_score;
    if !prev.digest.is_empty() && prev.digest == report.digest {
        return if prev.risk_score == current {
            " [content unchanged]".to_string()
        } else {
            format!(" [content unchanged, was {}]", prev.risk_score)
        };
    }
    format_delta(Some(prev.risk_score), current)
}

/// Build a new run from file reports and append to history
pub fn append_run(history: &mut HistoryFile, reports: &[FileReport]) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let files = reports
        .iter()
        .map(|r| {
            (
                r.file_path.to_string_lossy().to_string(),
                FileScore {
                    risk_score: r.result.risk_score,
                    risk_level: r.result.risk_level,
                    flags: r.result.flags.len(),
                    digest: r.digest.clone(),
                },
            )
        })
        .collect();
    history.runs.push(HistoryRun { timestamp, files });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Load, append and save in one step. Returns the root the history was written to.
pub fn record_run(start: &Path, reports: &[FileReport]) -> Option<PathBuf> {
    let root = find_project_root(start)?;
    let mut history = load_history(&root);
    append_run(&mut history, reports);
    if let Err(e) = save_history(&root, &history) {
        tracing::warn!("failed to save history in {}: {}", root.display(), e);
        return None;
    }
    Some(root)
}

/// Format delta for console: "[was 45, down 10]" or "[was 20, up 5]" or ""
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}]", current);
    }
    let diff = current as i16 - prev as i16;
    if diff > 0 {
        format!(" [was {}, up {}]", prev, diff)
    } else {
        format!(" [was {}, down {}]", prev, -diff)
    }
}

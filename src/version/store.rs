//! Flat-file outputs: an append-only CSV log and a JSON store keyed by pull request

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use crate::version::aggregate::{CategoryCounts, SemanticSummary};
use crate::version::error::StoreError;

pub const CSV_HEADER: &str =
    "pr_url,affected_modules,total,major,minor,patch,other,invalid_semver";

/// Module name -> per-category counts
pub type ModuleCounts = IndexMap<String, CategoryCounts>;

/// CSV file receiving one row per summarized report
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a row for the summary, writing the header first if the file is new
    pub fn append(&self, summary: &SemanticSummary) -> Result<(), StoreError> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if needs_header {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        writeln!(file, "{}", format_row(summary))?;

        Ok(())
    }
}

fn format_row(summary: &SemanticSummary) -> String {
    let counts = &summary.global;
    format!(
        "{},{},{},{},{},{},{},{}",
        escape_field(&summary.pr_url),
        summary.affected_modules,
        counts.total(),
        counts.major,
        counts.minor,
        counts.patch,
        counts.other,
        counts.invalid
    )
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// JSON store of per-module counts, keyed by pull request URL
///
/// Entries are never replaced once recorded.
#[derive(Debug, Default)]
pub struct SemanticStore {
    path: PathBuf,
    entries: IndexMap<String, ModuleCounts>,
}

impl SemanticStore {
    /// Load the store, treating a missing file as empty
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => IndexMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn contains(&self, pr_url: &str) -> bool {
        self.entries.contains_key(pr_url)
    }

    pub fn get(&self, pr_url: &str) -> Option<&ModuleCounts> {
        self.entries.get(pr_url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the counts of every module of every recorded pull request
    pub fn module_counts(&self) -> impl Iterator<Item = &CategoryCounts> {
        self.entries.values().flat_map(|modules| modules.values())
    }

    /// Add the per-module counts of a summary
    pub fn record(&mut self, summary: &SemanticSummary) -> Result<(), StoreError> {
        if self.contains(&summary.pr_url) {
            return Err(StoreError::AlreadyRecorded(summary.pr_url.clone()));
        }
        self.entries
            .insert(summary.pr_url.clone(), summary.modules.clone());
        Ok(())
    }

    /// Write the store as pretty JSON, replacing the file atomically
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        info!(
            "Saved {} pull requests to {:?}",
            self.entries.len(),
            self.path
        );
        Ok(())
    }
}

//! Common types for the dependency-tree extractor

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Omitted version -> number of times it was omitted
pub type OmittedVersions = IndexMap<String, u64>;

/// Dependency key (`group:artifact:resolvedVersion`) -> omitted versions
pub type ModuleConflicts = IndexMap<String, OmittedVersions>;

/// Module name -> conflicts recorded in that module's subtree
pub type ConflictRecord = IndexMap<String, ModuleConflicts>;

/// A single "omitted for conflict" entry found in a dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictEntry {
    pub group_id: String,
    pub artifact_id: String,
    /// Version the build tool kept
    pub resolved_version: String,
    /// Version the build tool discarded
    pub omitted_version: String,
}

impl ConflictEntry {
    /// Key under which the entry is stored: `group:artifact:resolvedVersion`
    pub fn dependency_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.resolved_version
        )
    }
}

/// Result of scanning one dependency-tree dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Number of conflict lines attributed to a module
    pub total_conflicts: u64,
    pub conflicts: ConflictRecord,
}

impl Extraction {
    /// Number of modules with at least one recorded conflict
    pub fn affected_modules(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Attach the pull request URL the dump was produced for
    pub fn into_report(self, pr_url: impl Into<String>) -> ConflictReport {
        ConflictReport {
            pr_url: pr_url.into(),
            total_conflicts: self.total_conflicts,
            affected_modules: self.conflicts.len() as u64,
            conflicts: self.conflicts,
        }
    }
}

/// Conflict report as exchanged on disk between extraction and summarization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub pr_url: String,
    pub total_conflicts: u64,
    pub affected_modules: u64,
    pub conflicts: ConflictRecord,
}

/// Split a dependency key into its resolved version (the last `:` segment)
pub fn resolved_version_of(dependency_key: &str) -> &str {
    dependency_key
        .rsplit_once(':')
        .map(|(_, version)| version)
        .unwrap_or(dependency_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("org.slf4j:slf4j-api:1.7.30", "1.7.30")]
    #[case("com.google.guava:guava:31.1-jre", "31.1-jre")]
    #[case("no-separator", "no-separator")]
    fn resolved_version_of_returns_last_segment(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(resolved_version_of(key), expected);
    }

    #[test]
    fn conflict_report_deserializes_from_json_document() {
        let report: ConflictReport = serde_json::from_str(
            r#"{
                "pr_url": "https://github.com/acme/widgets/pull/7",
                "total_conflicts": 3,
                "affected_modules": 1,
                "conflicts": {
                    "core": {
                        "org.slf4j:slf4j-api:1.7.30": { "1.7.25": 2, "1.6.1": 1 }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(report.total_conflicts, 3);
        let omitted = &report.conflicts["core"]["org.slf4j:slf4j-api:1.7.30"];
        assert_eq!(omitted.get_index(0), Some((&"1.7.25".to_string(), &2)));
        assert_eq!(omitted.get_index(1), Some((&"1.6.1".to_string(), &1)));
    }

    #[test]
    fn into_report_counts_modules() {
        let mut conflicts = ConflictRecord::new();
        conflicts.insert("a".to_string(), ModuleConflicts::new());
        conflicts.insert("b".to_string(), ModuleConflicts::new());
        let extraction = Extraction {
            total_conflicts: 4,
            conflicts,
        };

        let report = extraction.into_report("https://github.com/acme/widgets/pull/1");

        assert_eq!(report.affected_modules, 2);
        assert_eq!(report.total_conflicts, 4);
    }
}

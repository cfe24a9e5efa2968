//! Occurrence-weighted aggregation of classified conflicts

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parser::types::{ConflictReport, resolved_version_of};
use crate::version::semver::{DifferenceClass, classify};

/// Per-category conflict totals for one scope (a module, or a whole report)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredCounts", into = "StoredCounts")]
pub struct CategoryCounts {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub other: u64,
    pub invalid: u64,
}

impl CategoryCounts {
    pub fn add(&mut self, class: DifferenceClass, count: u64) {
        *self.slot_mut(class) += count;
    }

    pub fn get(&self, class: DifferenceClass) -> u64 {
        match class {
            DifferenceClass::Major => self.major,
            DifferenceClass::Minor => self.minor,
            DifferenceClass::Patch => self.patch,
            DifferenceClass::Other => self.other,
            DifferenceClass::Invalid => self.invalid,
        }
    }

    pub fn total(&self) -> u64 {
        self.major + self.minor + self.patch + self.other + self.invalid
    }

    fn slot_mut(&mut self, class: DifferenceClass) -> &mut u64 {
        match class {
            DifferenceClass::Major => &mut self.major,
            DifferenceClass::Minor => &mut self.minor,
            DifferenceClass::Patch => &mut self.patch,
            DifferenceClass::Other => &mut self.other,
            DifferenceClass::Invalid => &mut self.invalid,
        }
    }
}

/// On-disk shape of [`CategoryCounts`], with the derived `TOTAL` written out
#[derive(Serialize, Deserialize)]
struct StoredCounts {
    #[serde(rename = "MAJOR", default)]
    major: u64,
    #[serde(rename = "MINOR", default)]
    minor: u64,
    #[serde(rename = "PATCH", default)]
    patch: u64,
    #[serde(rename = "OTHER", default)]
    other: u64,
    #[serde(rename = "INVALID_SEMVER", default)]
    invalid_semver: u64,
    #[serde(rename = "TOTAL", default)]
    total: u64,
}

impl From<StoredCounts> for CategoryCounts {
    fn from(stored: StoredCounts) -> Self {
        Self {
            major: stored.major,
            minor: stored.minor,
            patch: stored.patch,
            other: stored.other,
            invalid: stored.invalid_semver,
        }
    }
}

impl From<CategoryCounts> for StoredCounts {
    fn from(counts: CategoryCounts) -> Self {
        Self {
            major: counts.major,
            minor: counts.minor,
            patch: counts.patch,
            other: counts.other,
            invalid_semver: counts.invalid,
            total: counts.total(),
        }
    }
}

/// Semantic differences of one conflict report, per module and overall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSummary {
    pub pr_url: String,
    pub affected_modules: u64,
    pub global: CategoryCounts,
    pub modules: IndexMap<String, CategoryCounts>,
}

/// Classify every conflict in the report, weighting each by how often it occurred
pub fn summarize(report: &ConflictReport) -> SemanticSummary {
    let mut global = CategoryCounts::default();
    let mut modules = IndexMap::with_capacity(report.conflicts.len());

    for (module, dependencies) in &report.conflicts {
        let mut module_counts = CategoryCounts::default();

        for (dependency_key, omitted_versions) in dependencies {
            let resolved = resolved_version_of(dependency_key);
            for (omitted, &count) in omitted_versions {
                let class = classify(resolved, omitted);
                module_counts.add(class, count);
                global.add(class, count);
            }
        }

        modules.insert(module.clone(), module_counts);
    }

    SemanticSummary {
        pr_url: report.pr_url.clone(),
        affected_modules: report.affected_modules,
        global,
        modules,
    }
}

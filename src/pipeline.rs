//! Glue between the maven runner, the extractor, and the output stores

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::maven::{RunnerError, TreeRun, TreeRunner};
use crate::parser::{ConflictReport, ExtractError, MavenTreeParser};
use crate::version::aggregate::{SemanticSummary, summarize};
use crate::version::error::StoreError;
use crate::version::store::{CsvLog, SemanticStore};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to read report {path:?}: {source}")]
    ReadReport {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid report {path:?}: {source}")]
    InvalidReport {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Extract the conflicts of a dependency-tree dump into a report for `pr_url`
pub fn extract_report(
    parser: &MavenTreeParser,
    dump: &Path,
    pr_url: &str,
) -> Result<ConflictReport, ExtractError> {
    let extraction = parser.extract_file(dump)?;
    if extraction.is_empty() {
        info!("No conflicting versions found in {:?}", dump);
    } else {
        info!(
            "{} conflicts in {} modules found in {:?}",
            extraction.total_conflicts,
            extraction.affected_modules(),
            dump
        );
    }
    Ok(extraction.into_report(pr_url))
}

/// Write the dependency tree of a project to `dump`
pub fn run_tree<R: TreeRunner>(
    runner: &R,
    project_dir: &Path,
    dump: &Path,
) -> Result<TreeRun, RunnerError> {
    let run = runner.dependency_tree(project_dir, dump)?;
    if !run.success {
        warn!(
            "Dependency tree for {:?} did not succeed (exit code {:?})",
            project_dir, run.exit_code
        );
    }
    Ok(run)
}

/// Run the dependency tree for a project into `dump`, then extract its conflicts.
///
/// Output of a failed build is still scanned.
pub fn analyze_project<R: TreeRunner>(
    runner: &R,
    parser: &MavenTreeParser,
    project_dir: &Path,
    dump: &Path,
    pr_url: &str,
) -> Result<ConflictReport, PipelineError> {
    run_tree(runner, project_dir, dump)?;
    Ok(extract_report(parser, dump, pr_url)?)
}

pub fn write_report(report: &ConflictReport, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

pub fn read_report(path: &Path) -> Result<ConflictReport, PipelineError> {
    let content = std::fs::read_to_string(path).map_err(|source| PipelineError::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PipelineError::InvalidReport {
        path: path.to_path_buf(),
        source,
    })
}

/// Summarize a report and append it to both outputs.
///
/// The store is checked first so a rejected report leaves the CSV untouched.
/// The store is only modified in memory; call [`SemanticStore::save`] afterwards.
pub fn record_summary(
    report: &ConflictReport,
    csv: &CsvLog,
    store: &mut SemanticStore,
) -> Result<SemanticSummary, StoreError> {
    if store.contains(&report.pr_url) {
        return Err(StoreError::AlreadyRecorded(report.pr_url.clone()));
    }

    let summary = summarize(report);
    csv.append(&summary)?;
    store.record(&summary)?;
    Ok(summary)
}

/// Summarize every report file, skipping the ones that fail.
///
/// The store is saved after each recorded report so the CSV never holds rows
/// the store has lost; a failed save stops the batch. Returns the number of
/// reports recorded.
pub fn process_reports(
    paths: &[PathBuf],
    csv: &CsvLog,
    store: &mut SemanticStore,
) -> Result<usize, StoreError> {
    let mut recorded = 0;

    for path in paths {
        let report = match read_report(path) {
            Ok(report) => report,
            Err(e) => {
                error!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        match record_summary(&report, csv, store) {
            Ok(summary) => {
                store.save()?;
                info!(
                    "Recorded {}: {} conflicts across {} modules",
                    summary.pr_url,
                    summary.global.total(),
                    summary.modules.len()
                );
                recorded += 1;
            }
            Err(StoreError::AlreadyRecorded(pr_url)) => {
                warn!("Skipping {:?}: {} is already recorded", path, pr_url);
            }
            Err(e) => {
                error!("Skipping {:?}: {}", path, e);
            }
        }
    }

    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::runner::MockTreeRunner;
    use mockall::predicate::function;
    use serde_json::json;
    use tempfile::TempDir;

    const DUMP: &str = "\
[INFO] Scanning for projects...
[INFO] --- dependency:3.8.1:tree (default-cli) @ core ---
[INFO] com.acme:core:jar:1.0
[INFO] +- com.acme:lib:jar:2.0.0:compile
[INFO] |  \\- (org.slf4j:slf4j-api:jar:1.7.25:compile - omitted for conflict with 1.7.30)
[INFO] +- (com.google.guava:guava:jar:20.0:compile - omitted for conflict with 31.1-jre)
[INFO] +- (com.google.guava:guava:jar:20.0:compile - omitted for conflict with 31.1-jre)
[INFO] --- dependency:3.8.1:tree (default-cli) @ web ---
[INFO] com.acme:web:war:1.0
[INFO] BUILD SUCCESS
";

    fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn analyze_project_extracts_runner_output() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("dep_tree.txt");
        let project = temp_dir.path().to_path_buf();
        let (expected_project, expected_dump) = (project.clone(), dump.clone());

        let mut runner = MockTreeRunner::new();
        runner
            .expect_dependency_tree()
            .with(
                function(move |p: &Path| p == expected_project.as_path()),
                function(move |p: &Path| p == expected_dump.as_path()),
            )
            .times(1)
            .returning(|_, output| {
                std::fs::write(output, DUMP).unwrap();
                Ok(TreeRun {
                    success: true,
                    exit_code: Some(0),
                })
            });

        let report = analyze_project(
            &runner,
            &MavenTreeParser::new(),
            &project,
            &dump,
            "https://github.com/acme/widgets/pull/5",
        )
        .unwrap();

        assert_eq!(report.total_conflicts, 3);
        assert_eq!(report.affected_modules, 1);
        assert_eq!(
            report.conflicts["core"]["com.google.guava:guava:31.1-jre"]["20.0"],
            2
        );
    }

    #[test]
    fn analyze_project_extracts_output_of_failed_build() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("dep_tree.txt");

        let mut runner = MockTreeRunner::new();
        runner.expect_dependency_tree().returning(|_, output| {
            std::fs::write(output, DUMP).unwrap();
            Ok(TreeRun {
                success: false,
                exit_code: Some(1),
            })
        });

        let report = analyze_project(
            &runner,
            &MavenTreeParser::new(),
            temp_dir.path(),
            &dump,
            "https://github.com/acme/widgets/pull/6",
        )
        .unwrap();

        assert_eq!(report.total_conflicts, 3);
    }

    #[test]
    fn analyze_project_propagates_runner_error() {
        let temp_dir = TempDir::new().unwrap();

        let mut runner = MockTreeRunner::new();
        runner.expect_dependency_tree().returning(|_, _| {
            Err(RunnerError::Spawn {
                command: "mvn".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        });

        let result = analyze_project(
            &runner,
            &MavenTreeParser::new(),
            temp_dir.path(),
            &temp_dir.path().join("dep_tree.txt"),
            "https://github.com/acme/widgets/pull/7",
        );

        assert!(matches!(result, Err(PipelineError::Runner(_))));
    }

    #[test]
    fn record_summary_leaves_csv_untouched_for_recorded_pull_request() {
        let temp_dir = TempDir::new().unwrap();
        let csv = CsvLog::new(temp_dir.path().join("out.csv"));
        let mut store = SemanticStore::load(temp_dir.path().join("store.json")).unwrap();
        let report = read_report(&write_json(
            temp_dir.path(),
            "report.json",
            json!({
                "pr_url": "https://github.com/acme/widgets/pull/8",
                "total_conflicts": 1,
                "affected_modules": 1,
                "conflicts": { "core": { "g:a:2.0": { "1.0": 1 } } }
            }),
        ))
        .unwrap();

        record_summary(&report, &csv, &mut store).unwrap();
        let result = record_summary(&report, &csv, &mut store);

        assert!(matches!(result, Err(StoreError::AlreadyRecorded(_))));
        let content = std::fs::read_to_string(csv.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn process_reports_skips_unreadable_and_duplicate_reports() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let report = json!({
            "pr_url": "https://github.com/acme/widgets/pull/10",
            "total_conflicts": 2,
            "affected_modules": 1,
            "conflicts": { "core": { "g:a:2.0": { "1.0": 2 } } }
        });
        let paths = vec![
            write_json(dir, "first.json", report.clone()),
            dir.join("missing.json"),
            write_json(dir, "broken.json", json!({ "pr_url": 1 })),
            write_json(dir, "again.json", report),
        ];
        let csv = CsvLog::new(dir.join("out.csv"));
        let mut store = SemanticStore::load(dir.join("store.json")).unwrap();

        let recorded = process_reports(&paths, &csv, &mut store).unwrap();

        assert_eq!(recorded, 1);
        let reloaded = SemanticStore::load(dir.join("store.json")).unwrap();
        let modules = reloaded
            .get("https://github.com/acme/widgets/pull/10")
            .unwrap();
        assert_eq!(modules["core"].major, 2);
    }

    #[test]
    fn process_reports_stops_when_store_cannot_be_saved() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let paths = vec![
            write_json(
                dir,
                "first.json",
                json!({
                    "pr_url": "https://github.com/acme/widgets/pull/20",
                    "total_conflicts": 1,
                    "affected_modules": 1,
                    "conflicts": { "core": { "g:a:2.0": { "1.0": 1 } } }
                }),
            ),
            write_json(
                dir,
                "second.json",
                json!({
                    "pr_url": "https://github.com/acme/widgets/pull/21",
                    "total_conflicts": 1,
                    "affected_modules": 1,
                    "conflicts": { "core": { "g:a:2.0": { "1.5": 1 } } }
                }),
            ),
        ];
        let csv = CsvLog::new(dir.join("out.csv"));
        let store_path = dir.join("store.json");
        let mut store = SemanticStore::load(&store_path).unwrap();
        std::fs::create_dir(&store_path).unwrap();

        let result = process_reports(&paths, &csv, &mut store);

        assert!(matches!(result, Err(StoreError::Io(_))));
        let content = std::fs::read_to_string(csv.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn write_report_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("report.json");
        let report = MavenTreeParser::new()
            .extract_file(&write_dump(temp_dir.path()))
            .unwrap()
            .into_report("https://github.com/acme/widgets/pull/11");

        write_report(&report, &path).unwrap();

        assert_eq!(read_report(&path).unwrap(), report);
    }

    fn write_dump(dir: &Path) -> PathBuf {
        let path = dir.join("dep_tree.txt");
        std::fs::write(&path, DUMP).unwrap();
        path
    }
}

//! Runs the dependency plugin's `tree` goal for a Maven project

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MavenConfig;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Project directory not found: {0:?}")]
    ProjectNotFound(PathBuf),

    #[error("Failed to create output file {path:?}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Outcome of a dependency-tree run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRun {
    /// Whether the build tool exited successfully
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// Trait for producing a dependency-tree dump for a project
#[cfg_attr(test, automock)]
pub trait TreeRunner {
    /// Write the dependency tree of `project_dir` to `output`
    ///
    /// A failed build still leaves its output in `output`; only failing to start
    /// the tool is an error.
    fn dependency_tree(&self, project_dir: &Path, output: &Path) -> Result<TreeRun, RunnerError>;
}

/// Runner invoking `mvn <plugin>:tree -Dverbose --fail-never`
pub struct MavenRunner {
    config: MavenConfig,
}

impl MavenRunner {
    pub fn new(config: MavenConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the Maven executable
    pub fn arguments(&self) -> Vec<String> {
        let mut args = vec![format!(
            "org.apache.maven.plugins:maven-dependency-plugin:{}:tree",
            self.config.plugin_version
        )];
        if self.config.verbose {
            args.push("-Dverbose".to_string());
        }
        if self.config.fail_never {
            args.push("--fail-never".to_string());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args
    }
}

impl Default for MavenRunner {
    fn default() -> Self {
        Self::new(MavenConfig::default())
    }
}

impl TreeRunner for MavenRunner {
    fn dependency_tree(&self, project_dir: &Path, output: &Path) -> Result<TreeRun, RunnerError> {
        if !project_dir.is_dir() {
            return Err(RunnerError::ProjectNotFound(project_dir.to_path_buf()));
        }

        let output_error = |source: std::io::Error| RunnerError::Output {
            path: output.to_path_buf(),
            source,
        };
        let stdout = File::create(output).map_err(output_error)?;
        let stderr = stdout.try_clone().map_err(output_error)?;

        info!(
            "Running {} dependency tree in {:?}",
            self.config.command, project_dir
        );
        let status = Command::new(&self.config.command)
            .args(self.arguments())
            .current_dir(project_dir)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .map_err(|source| RunnerError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        if !status.success() {
            warn!(
                "{} exited with {} for {:?}; output kept in {:?}",
                self.config.command, status, project_dir, output
            );
        }

        Ok(TreeRun {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}

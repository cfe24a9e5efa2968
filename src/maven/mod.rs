//! Maven integration
//! - runner.rs: TreeRunner trait and the `mvn` process implementation

pub mod runner;

pub use runner::{MavenRunner, RunnerError, TreeRun, TreeRunner};

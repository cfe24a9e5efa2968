//! Dependency version conflict analysis for Maven projects.
//!
//! - [`parser`]: extraction of "omitted for conflict" entries from `dependency:tree` dumps
//! - [`version`]: semantic distance classification, aggregation, and output stores
//! - [`maven`]: running the dependency-tree goal for a checked-out project
//! - [`pipeline`]: glue between the layers used by the CLI

pub mod config;
pub mod logging;
pub mod maven;
pub mod parser;
pub mod pipeline;
pub mod version;

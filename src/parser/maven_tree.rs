//! Maven `dependency:tree -Dverbose` output parser
//!
//! Collects "omitted for conflict" entries per build module.
//!
//! Format examples:
//! - Module header (Maven 3.9 short banner or the long plugin name):
//!   ```text
//!   [INFO] --- dependency:3.8.1:tree (default-cli) @ core ---
//!   [INFO] --- maven-dependency-plugin:3.8.1:tree (default-cli) @ core ---
//!   ```
//! - Conflict:
//!   ```text
//!   [INFO] |  +- (org.slf4j:slf4j-api:jar:1.7.25:compile - omitted for conflict with 1.7.30)
//!   ```
//!
//! The version inside the coordinate is the one Maven dropped, the version after
//! "conflict with" is the one it kept.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::parser::traits::{ConflictExtractor, ExtractError};
use crate::parser::types::{ConflictEntry, Extraction};

/// Parser for verbose Maven dependency trees
pub struct MavenTreeParser {
    /// Regex for the dependency plugin banner: `dependency:3.8.1:tree ... @ module`
    module_re: Regex,
    /// Regex for a conflict: `group:artifact:type[:classifier]:version:scope [(optional)] - ... omitted for conflict with X`
    conflict_re: Regex,
}

impl MavenTreeParser {
    pub fn new() -> Self {
        Self {
            module_re: Regex::new(r"dependency(?:-plugin)?:\S+?:tree\b.*?@ ([\w.\-]+)").unwrap(),
            conflict_re: Regex::new(
                r"([\w.\-]+):([\w.\-]+):([\w.\-:]+)(?: \(optional\))? - [^)]*?omitted for conflict with ([\w.\-]+)",
            )
            .unwrap(),
        }
    }

    /// Extract conflicts from a dump on disk.
    ///
    /// An unreadable file yields an empty extraction; only structural problems
    /// in the content are errors. Bytes that are not valid UTF-8 (console output
    /// in a legacy code page) are replaced rather than failing the whole dump.
    pub fn extract_file(&self, path: &Path) -> Result<Extraction, ExtractError> {
        match std::fs::read(path) {
            Ok(bytes) => self.extract(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                warn!("Failed to read dependency tree {:?}: {}", path, e);
                Ok(Extraction::default())
            }
        }
    }

    fn parse_module_header<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.module_re
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn parse_conflict(&self, line: &str) -> Option<ConflictEntry> {
        let caps = self.conflict_re.captures(line)?;

        // type[:classifier]:version:scope
        let rest: Vec<&str> = caps[3].split(':').collect();
        if rest.len() < 3 {
            debug!("Skipping conflict with unexpected coordinate: {}", line.trim());
            return None;
        }

        Some(ConflictEntry {
            group_id: caps[1].to_string(),
            artifact_id: caps[2].to_string(),
            resolved_version: caps[4].to_string(),
            omitted_version: rest[rest.len() - 2].to_string(),
        })
    }
}

impl Default for MavenTreeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictExtractor for MavenTreeParser {
    fn extract(&self, content: &str) -> Result<Extraction, ExtractError> {
        let mut extraction = Extraction::default();
        let mut seen_modules: HashSet<&str> = HashSet::new();
        let mut current_module: Option<&str> = None;

        for (line_num, line) in content.lines().enumerate() {
            if let Some(module) = self.parse_module_header(line) {
                if !seen_modules.insert(module) {
                    return Err(ExtractError::DuplicateModule {
                        module: module.to_string(),
                        line: line_num + 1,
                    });
                }
                current_module = Some(module);
                continue;
            }

            let Some(entry) = self.parse_conflict(line) else {
                continue;
            };

            let Some(module) = current_module else {
                debug!("Discarding conflict before first module header: {}", line.trim());
                continue;
            };

            *extraction
                .conflicts
                .entry(module.to_string())
                .or_default()
                .entry(entry.dependency_key())
                .or_default()
                .entry(entry.omitted_version)
                .or_insert(0) += 1;
            extraction.total_conflicts += 1;
        }

        Ok(extraction)
    }
}

//! Extractor trait definition

use crate::parser::types::Extraction;

/// Trait for extracting dependency conflicts from build tool output
pub trait ConflictExtractor {
    /// Scan the content and collect conflicts per module
    fn extract(&self, content: &str) -> Result<Extraction, ExtractError>;
}

/// Error type for extraction operations
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The same module header appeared twice in one dump
    #[error("Duplicate module '{module}' at line {line}")]
    DuplicateModule { module: String, line: usize },
}

//! Parser layer
//! - traits.rs: ConflictExtractor trait definition
//! - types.rs: Common types (ConflictRecord, ConflictReport, Extraction)
//! - maven_tree.rs: Maven dependency:tree parser

pub mod maven_tree;
pub mod traits;
pub mod types;

pub use maven_tree::MavenTreeParser;
pub use traits::{ConflictExtractor, ExtractError};
pub use types::{ConflictEntry, ConflictRecord, ConflictReport, Extraction};

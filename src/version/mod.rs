//! Version layer for conflict classification
//!
//! Turns extracted conflicts into semantic-distance tallies and persists them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ConflictReport│────▶│  Aggregate  │────▶│    Store    │
//! │  (parser)    │     │ (fold/weigh)│     │ (CSV, JSON) │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!                             │                   │
//!                             ▼                   ▼
//!                      ┌─────────────┐     ┌─────────────┐
//!                      │   Semver    │     │    Stats    │
//!                      │ (classify)  │     │ (min/median)│
//!                      └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: version parsing and MAJOR/MINOR/PATCH/OTHER/INVALID classification
//! - [`aggregate`]: occurrence-weighted per-module and global counts
//! - [`store`]: append-only CSV log and JSON store keyed by pull request
//! - [`stats`]: descriptive statistics over the JSON store
//! - [`error`]: Error types for parsing and storage

pub mod aggregate;
pub mod error;
pub mod semver;
pub mod stats;
pub mod store;

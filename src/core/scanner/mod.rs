//! # Scanner Module
//!
//! Discovers candidate files in the source tree.
//!
//! Only files whose extension appears in the category table are collected
//! (case-insensitive, so `photo.JPG` and `photo.jpg` both match). Records
//! come back sorted by filename timestamp, then path, giving the duplicate
//! grouper a stable "first seen" order.

mod filter;
mod walker;

pub use filter::ExtensionFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discovered file, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the file (unique identifier for the run)
    pub path: PathBuf,
    /// Lowercased extension without the leading dot
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Timestamp parsed from a `YYYYMMDD-HHMMSS` filename prefix, if any
    pub timestamp: Option<NaiveDateTime>,
}

impl FileRecord {
    /// Sort key: filename timestamp first (epoch for files without one),
    /// then path for a total order.
    pub fn sort_key(&self) -> (NaiveDateTime, &PathBuf) {
        let epoch = NaiveDateTime::UNIX_EPOCH;
        (self.timestamp.unwrap_or(epoch), &self.path)
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered files, in timestamp-then-path order
    pub files: Vec<FileRecord>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for source-tree scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait SourceScanner: Send + Sync {
    /// Scan a source root and return discovered files
    fn scan(&self, root: &PathBuf) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        root: &PathBuf,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}

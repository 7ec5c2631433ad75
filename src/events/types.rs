//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the sorting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Classification + signature phase events
    Sign(SignEvent),
    /// Duplicate grouping phase events
    Group(GroupEvent),
    /// Relocation phase events
    Relocate(RelocateEvent),
    /// Source cleanup phase events
    Cleanup(CleanupEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// A candidate file was found
    FileFound { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_files: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of files found so far
    pub files_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events during the classification + signature phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SignEvent {
    /// Signing has started
    Started { total_files: usize },
    /// Progress update
    Progress(SignProgress),
    /// A file was classified and signed
    FileSigned { path: PathBuf, category: String },
    /// A file could not be signed; it stays in the run without a signature
    Unreadable { path: PathBuf, message: String },
    /// Signing completed
    Completed {
        total_signed: usize,
        unreadable: usize,
    },
}

/// Progress information during signing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignProgress {
    /// Number of files processed so far
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// Current file being processed
    pub current_path: PathBuf,
}

/// Events during the duplicate grouping phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// Grouping has started
    Started { total_files: usize },
    /// A duplicate was attached to a canonical file
    DuplicateFound {
        canonical: PathBuf,
        duplicate: PathBuf,
    },
    /// Grouping completed
    Completed {
        unique_files: usize,
        duplicate_files: usize,
    },
}

/// Events during the relocation phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelocateEvent {
    /// Relocation has started
    Started { total_files: usize },
    /// A file was moved to its batch folder
    FileMoved { from: PathBuf, to: PathBuf },
    /// A move failed; the run continues
    Error { path: PathBuf, message: String },
    /// Relocation completed
    Completed { moved: usize, failed: usize },
}

/// Events during source cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CleanupEvent {
    /// Cleanup has started
    Started {
        files_to_remove: usize,
        directories_to_remove: usize,
    },
    /// Cleanup completed
    Completed {
        files_removed: usize,
        directories_removed: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Signing,
    Grouping,
    Relocating,
    Cleaning,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total files discovered in the source tree
    pub total_files: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding canonicals)
    pub duplicate_count: usize,
    /// Files moved into batch folders
    pub relocated: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Signing => write!(f, "Signing"),
            PipelinePhase::Grouping => write!(f, "Grouping"),
            PipelinePhase::Relocating => write!(f, "Relocating"),
            PipelinePhase::Cleaning => write!(f, "Cleaning"),
        }
    }
}

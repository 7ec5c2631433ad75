//! # Error Module
//!
//! Error types for the file sorter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures are not fatal** - callers decide whether to log,
//!   skip, or abort; only the source root being unreadable kills a run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SorterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("Cleanup error: {0}")]
    Cleanup(#[from] CleanupError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while scanning the source tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a file's signature
///
/// These are all non-fatal: a file with a failed signature is excluded from
/// duplicate detection but still classified and relocated.
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("File is empty: {path}")]
    EmptyFile { path: PathBuf },
}

/// Errors that occur while moving files to their batch folders
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Destination already occupied: {path}")]
    DestinationOccupied { path: PathBuf },

    #[error("Failed to create batch folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {path}: {reason}")]
    MoveFailed { path: PathBuf, reason: String },
}

/// Errors that occur while cleaning the source tree
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SorterError>;

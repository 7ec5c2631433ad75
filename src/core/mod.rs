//! # Core Module
//!
//! The UI-agnostic sorting engine.
//!
//! ## Modules
//! - `scanner` - Discovers candidate files in the source tree
//! - `classifier` - Resolves each file's content category
//! - `signature` - Computes comparable content signatures
//! - `grouper` - Collapses matching signatures into duplicate groups
//! - `allocator` - Packs files into capacity-bounded batch folders
//! - `relocate` - Executes the planned moves
//! - `cleanup` - Removes duplicates, markers, and emptied directories
//! - `pipeline` - Orchestrates the full workflow

pub mod allocator;
pub mod classifier;
pub mod cleanup;
pub mod grouper;
pub mod pipeline;
pub mod relocate;
pub mod scanner;
pub mod signature;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use allocator::{BatchAllocator, NumberingMode, DEFAULT_BATCH_CAPACITY};
pub use classifier::{Category, CategoryResolver};
pub use grouper::{DuplicateGroup, DuplicateGrouper};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineResult};
pub use relocate::OperationMode;
pub use scanner::FileRecord;
pub use signature::{Signature, SignatureEngine};

/// A scanned file with its resolved category and, when the content was
/// readable, its signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedFile {
    /// The underlying scan record
    pub record: FileRecord,
    /// Resolved content category
    pub category: Category,
    /// Content signature; `None` means the file could not be signed and
    /// is excluded from duplicate detection
    pub signature: Option<Signature>,
}

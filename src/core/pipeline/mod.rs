//! # Pipeline Module
//!
//! Orchestrates the full sorting workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover candidate files in the source tree
//! 2. **Sign** - Classify each file and compute its content signature
//! 3. **Group** - Collapse files with matching signatures into groups
//! 4. **Relocate** - Pack unique files into capacity-bounded batch folders
//! 5. **Clean** - Remove duplicates, markers, and emptied directories
//!
//! Stages run sequentially; each consumes the previous stage's output in
//! full before the next starts, so a failure partway through one file never
//! corrupts another stage's view of the tree.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};

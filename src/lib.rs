//! # Tidybatch
//!
//! A batch file sorter that classifies files by content, collapses
//! duplicates, and packs the survivors into capacity-bounded batch folders.
//!
//! ## Core Philosophy
//! - **Never overwrite** - An occupied destination slot is skipped, not clobbered
//! - **Never lose data** - Only confirmed duplicates and emptied folders are deleted
//! - **Keep going** - One unreadable file never aborts the run
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - The classify/dedup/relocate engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types with per-file context
//! - `cli` - Command-line interface (binary side)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SorterError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}

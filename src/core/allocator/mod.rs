//! # Allocator Module
//!
//! Assigns each file a destination slot of the form
//! `<destination>/<category>/batch_NNN/<filename>`, filling batch folders
//! sequentially up to a fixed capacity before opening the next one.
//!
//! Occupancy is probed from disk once per batch, when the allocator first
//! enters it, and tracked in memory afterwards. Batches that are already
//! full on disk are skipped, so re-running against a partially sorted
//! destination continues packing instead of overfilling.

use crate::core::classifier::Category;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Default batch folder capacity
pub const DEFAULT_BATCH_CAPACITY: usize = 500;

fn batch_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^batch_(\d{3})$").expect("valid regex"))
}

/// Folder name for a batch index, zero-padded to three digits
pub fn batch_folder_name(index: u32) -> String {
    format!("batch_{:03}", index)
}

/// How batch numbering starts for each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingMode {
    /// Start at `batch_001` regardless of what the destination holds
    Fresh,
    /// Open the batch after the highest existing one per category
    Resume,
}

/// Configuration for the batch allocator
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Root directory batches are created under
    pub destination: PathBuf,
    /// Maximum number of files per batch folder
    pub capacity: usize,
    /// Fresh or resumed numbering
    pub numbering: NumberingMode,
}

impl AllocatorConfig {
    /// Config with default capacity and fresh numbering
    pub fn new(destination: PathBuf) -> Self {
        Self {
            destination,
            capacity: DEFAULT_BATCH_CAPACITY,
            numbering: NumberingMode::Fresh,
        }
    }
}

/// Fill state of the batch a category is currently packing into
#[derive(Debug, Clone, Copy)]
struct BatchState {
    index: u32,
    occupancy: usize,
}

/// Assigns destination paths, packing files into capacity-bounded batches.
///
/// Allocation is stateful: each call counts toward the current batch of the
/// file's category, so one allocator instance must serve a whole run.
pub struct BatchAllocator {
    config: AllocatorConfig,
    states: HashMap<Category, BatchState>,
}

impl BatchAllocator {
    /// Create an allocator with the given configuration
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    /// Assign the next destination slot for a file of `category`.
    ///
    /// Does not touch the filesystem beyond occupancy probes; directory
    /// creation happens when the move executes.
    pub fn allocate(&mut self, category: Category, filename: &OsStr) -> PathBuf {
        let category_dir = self.config.destination.join(category.as_str());

        let state = match self.states.entry(category) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let initial =
                    Self::initial_state(&category_dir, self.config.numbering);
                debug!(
                    category = category.as_str(),
                    batch = initial.index,
                    occupancy = initial.occupancy,
                    "entering category"
                );
                entry.insert(initial)
            }
        };

        // Skip over batches that are already at capacity, probing each new
        // batch once in case a previous run left files in it
        while state.occupancy >= self.config.capacity {
            state.index += 1;
            state.occupancy =
                probe_occupancy(&category_dir.join(batch_folder_name(state.index)));
        }

        state.occupancy += 1;
        category_dir
            .join(batch_folder_name(state.index))
            .join(filename)
    }

    fn initial_state(category_dir: &Path, numbering: NumberingMode) -> BatchState {
        let index = match numbering {
            NumberingMode::Fresh => 1,
            NumberingMode::Resume => latest_batch_index(category_dir).map_or(1, |i| i + 1),
        };
        BatchState {
            index,
            occupancy: probe_occupancy(&category_dir.join(batch_folder_name(index))),
        }
    }
}

/// Count of entries in a batch folder; missing or unreadable folders are
/// treated as empty
fn probe_occupancy(batch_dir: &Path) -> usize {
    match fs::read_dir(batch_dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).count(),
        Err(_) => 0,
    }
}

/// Highest `batch_NNN` folder index under a category directory
fn latest_batch_index(category_dir: &Path) -> Option<u32> {
    let entries = fs::read_dir(category_dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            let captures = batch_name_pattern().captures(name)?;
            captures[1].parse::<u32>().ok()
        })
        .max()
}

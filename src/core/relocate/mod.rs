//! # Relocate Module
//!
//! Executes a relocation plan: creates batch folders on demand and moves
//! (or copies) each file into its allocated slot.
//!
//! Per-file failures never abort the run. A missing source, an occupied
//! destination, or a failed move is recorded and the executor continues
//! with the next file.

use crate::core::classifier::Category;
use crate::error::RelocateError;
use crate::events::{Event, EventSender, RelocateEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Whether relocation moves files or copies them, leaving sources in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMode {
    /// Move files; falls back to copy + delete across filesystems
    Move,
    /// Copy files; the source tree is left untouched
    Copy,
}

/// A single planned relocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

/// The full set of moves for a run, in execution order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelocationPlan {
    pub moves: Vec<PlannedMove>,
}

impl RelocationPlan {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Result of executing a relocation plan
#[derive(Debug, Default)]
pub struct RelocationOutcome {
    /// Source paths that were successfully relocated
    pub relocated: Vec<PathBuf>,
    /// Batch folders created during execution
    pub folders_created: usize,
    /// Per-file failures, in plan order
    pub errors: Vec<RelocateError>,
}

/// Executes relocation plans.
pub struct RelocationExecutor {
    mode: OperationMode,
}

impl RelocationExecutor {
    /// Create an executor for the given operation mode
    pub fn new(mode: OperationMode) -> Self {
        Self { mode }
    }

    /// Execute every move in the plan, skipping failures.
    pub fn execute(&self, plan: &RelocationPlan, events: &EventSender) -> RelocationOutcome {
        events.send(Event::Relocate(RelocateEvent::Started {
            total_files: plan.len(),
        }));

        let mut outcome = RelocationOutcome::default();
        let mut created_dirs: HashSet<PathBuf> = HashSet::new();

        for planned in &plan.moves {
            match self.execute_one(planned, &mut created_dirs, &mut outcome.folders_created) {
                Ok(()) => {
                    events.send(Event::Relocate(RelocateEvent::FileMoved {
                        from: planned.source.clone(),
                        to: planned.destination.clone(),
                    }));
                    outcome.relocated.push(planned.source.clone());
                }
                Err(error) => {
                    warn!(source = %planned.source.display(), %error, "relocation failed");
                    events.send(Event::Relocate(RelocateEvent::Error {
                        path: planned.source.clone(),
                        message: error.to_string(),
                    }));
                    outcome.errors.push(error);
                }
            }
        }

        events.send(Event::Relocate(RelocateEvent::Completed {
            moved: outcome.relocated.len(),
            failed: outcome.errors.len(),
        }));

        outcome
    }

    fn execute_one(
        &self,
        planned: &PlannedMove,
        created_dirs: &mut HashSet<PathBuf>,
        folders_created: &mut usize,
    ) -> Result<(), RelocateError> {
        if !planned.source.exists() {
            return Err(RelocateError::SourceMissing {
                path: planned.source.clone(),
            });
        }

        // Never overwrite: a slot that already holds a file is skipped and
        // reported, the file stays where it was
        if planned.destination.exists() {
            return Err(RelocateError::DestinationOccupied {
                path: planned.destination.clone(),
            });
        }

        if let Some(parent) = planned.destination.parent() {
            if !created_dirs.contains(parent) {
                if !parent.exists() {
                    fs::create_dir_all(parent).map_err(|source| RelocateError::CreateFolder {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                    *folders_created += 1;
                }
                created_dirs.insert(parent.to_path_buf());
            }
        }

        let result = match self.mode {
            OperationMode::Copy => fs::copy(&planned.source, &planned.destination).map(|_| ()),
            OperationMode::Move => {
                fs::rename(&planned.source, &planned.destination).or_else(|_| {
                    // rename fails across filesystems, fall back to copy +
                    // delete with size verification before deleting source
                    let source_size = fs::metadata(&planned.source)?.len();
                    fs::copy(&planned.source, &planned.destination)?;

                    let dest_size = fs::metadata(&planned.destination)?.len();
                    if dest_size != source_size {
                        let _ = fs::remove_file(&planned.destination);
                        return Err(std::io::Error::other(format!(
                            "copy verification failed: source {} bytes, dest {} bytes",
                            source_size, dest_size
                        )));
                    }

                    fs::remove_file(&planned.source)
                })
            }
        };

        result.map_err(|e| RelocateError::MoveFailed {
            path: planned.source.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use tempfile::TempDir;

    fn plan_one(source: PathBuf, destination: PathBuf) -> RelocationPlan {
        RelocationPlan {
            moves: vec![PlannedMove {
                source,
                destination,
                category: Category::Notes,
            }],
        }
    }

    #[test]
    fn move_relocates_file_and_creates_folders() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("note.txt");
        fs::write(&source, "content").unwrap();

        let destination = dest.path().join("notes/batch_001/note.txt");
        let executor = RelocationExecutor::new(OperationMode::Move);
        let outcome = executor.execute(&plan_one(source.clone(), destination.clone()), &null_sender());

        assert_eq!(outcome.relocated, vec![source.clone()]);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.folders_created, 1);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "content");
    }

    #[test]
    fn copy_leaves_source_in_place() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("note.txt");
        fs::write(&source, "content").unwrap();

        let destination = dest.path().join("notes/batch_001/note.txt");
        let executor = RelocationExecutor::new(OperationMode::Copy);
        let outcome = executor.execute(&plan_one(source.clone(), destination.clone()), &null_sender());

        assert_eq!(outcome.relocated.len(), 1);
        assert!(source.exists());
        assert!(destination.exists());
    }

    #[test]
    fn occupied_destination_is_skipped_not_overwritten() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("note.txt");
        fs::write(&source, "new").unwrap();

        let destination = dest.path().join("notes/batch_001/note.txt");
        fs::create_dir_all(destination.parent().unwrap()).unwrap();
        fs::write(&destination, "old").unwrap();

        let executor = RelocationExecutor::new(OperationMode::Move);
        let outcome = executor.execute(&plan_one(source.clone(), destination.clone()), &null_sender());

        assert!(outcome.relocated.is_empty());
        assert!(matches!(
            outcome.errors[0],
            RelocateError::DestinationOccupied { .. }
        ));
        // Both files untouched
        assert_eq!(fs::read_to_string(&source).unwrap(), "new");
        assert_eq!(fs::read_to_string(&destination).unwrap(), "old");
    }

    #[test]
    fn missing_source_is_recorded_and_run_continues() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let present = src.path().join("b.txt");
        fs::write(&present, "x").unwrap();

        let plan = RelocationPlan {
            moves: vec![
                PlannedMove {
                    source: src.path().join("a.txt"),
                    destination: dest.path().join("notes/batch_001/a.txt"),
                    category: Category::Notes,
                },
                PlannedMove {
                    source: present.clone(),
                    destination: dest.path().join("notes/batch_001/b.txt"),
                    category: Category::Notes,
                },
            ],
        };

        let executor = RelocationExecutor::new(OperationMode::Move);
        let outcome = executor.execute(&plan, &null_sender());

        assert_eq!(outcome.relocated, vec![present]);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            RelocateError::SourceMissing { .. }
        ));
    }

    #[test]
    fn folders_are_counted_once() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt"] {
            fs::write(src.path().join(name), "x").unwrap();
        }

        let plan = RelocationPlan {
            moves: ["a.txt", "b.txt"]
                .iter()
                .map(|name| PlannedMove {
                    source: src.path().join(name),
                    destination: dest.path().join("notes/batch_001").join(name),
                    category: Category::Notes,
                })
                .collect(),
        };

        let executor = RelocationExecutor::new(OperationMode::Move);
        let outcome = executor.execute(&plan, &null_sender());

        assert_eq!(outcome.relocated.len(), 2);
        assert_eq!(outcome.folders_created, 1);
    }
}

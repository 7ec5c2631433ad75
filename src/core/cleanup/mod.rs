//! # Cleanup Module
//!
//! After relocation the source tree holds duplicates, OS marker files, and
//! the empty directory skeleton left behind by the moves. Cleanup removes
//! all three in two steps:
//!
//! 1. Plan: walk the tree once and simulate the deletions, producing the
//!    exact list of files and directories to remove. Directories come out
//!    bottom-up, so each `remove_dir` only ever sees an already-emptied
//!    directory. The source root itself is always retained.
//! 2. Execute: apply the plan, skipping and recording failures.

use crate::error::CleanupError;
use crate::events::{CleanupEvent, Event, EventSender};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Marker files removed on sight; they never block a directory's removal
const MARKER_FILES: &[&str] = &[".DS_Store"];

fn is_marker(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| MARKER_FILES.contains(&n))
        .unwrap_or(false)
}

/// What cleanup will remove, in removal order
#[derive(Debug, Default)]
pub struct CleanupPlan {
    /// Duplicate files still sitting in the source tree
    pub duplicates: Vec<PathBuf>,
    /// OS marker files such as `.DS_Store`
    pub markers: Vec<PathBuf>,
    /// Directories that will be empty once the files above are gone,
    /// ordered children before parents
    pub directories: Vec<PathBuf>,
}

impl CleanupPlan {
    pub fn file_count(&self) -> usize {
        self.duplicates.len() + self.markers.len()
    }
}

/// Result of executing a cleanup plan
#[derive(Debug, Default)]
pub struct CleanupOutcome {
    pub files_removed: usize,
    pub directories_removed: usize,
    pub errors: Vec<CleanupError>,
}

/// Plans and executes source-tree cleanup.
pub struct CleanupPlanner;

impl CleanupPlanner {
    /// Build a cleanup plan for `source_root`.
    ///
    /// `duplicates` are the files grouping decided to discard. Directories
    /// are scheduled only if every entry inside them is itself scheduled
    /// for removal; the root is never scheduled.
    pub fn plan(source_root: &Path, duplicates: &HashSet<PathBuf>) -> CleanupPlan {
        let mut plan = CleanupPlan::default();
        // The root's own emptiness is irrelevant, it always stays
        Self::visit(source_root, duplicates, &mut plan, true);
        plan
    }

    /// Recursively plan a directory; returns whether it will be empty
    /// after the planned removals.
    fn visit(
        dir: &Path,
        duplicates: &HashSet<PathBuf>,
        plan: &mut CleanupPlan,
        is_root: bool,
    ) -> bool {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                // Unreadable directories are left alone
                warn!(path = %dir.display(), %error, "skipping unreadable directory");
                return false;
            }
        };

        let mut will_be_empty = true;

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();

            if path.is_dir() {
                if Self::visit(&path, duplicates, plan, false) {
                    plan.directories.push(path);
                } else {
                    will_be_empty = false;
                }
            } else if is_marker(&path) {
                plan.markers.push(path);
            } else if duplicates.contains(&path) {
                plan.duplicates.push(path);
            } else {
                will_be_empty = false;
            }
        }

        will_be_empty && !is_root
    }

    /// Execute a plan, removing files first and directories bottom-up.
    /// Failures are recorded and skipped.
    pub fn execute(plan: &CleanupPlan, events: &EventSender) -> CleanupOutcome {
        events.send(Event::Cleanup(CleanupEvent::Started {
            files_to_remove: plan.file_count(),
            directories_to_remove: plan.directories.len(),
        }));

        let mut outcome = CleanupOutcome::default();

        for path in plan.duplicates.iter().chain(plan.markers.iter()) {
            match fs::remove_file(path) {
                Ok(()) => outcome.files_removed += 1,
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "failed to remove file");
                    outcome.errors.push(CleanupError::RemoveFailed {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        for dir in &plan.directories {
            // remove_dir refuses non-empty directories, so a failed file
            // removal above safely blocks its ancestors here
            match fs::remove_dir(dir) {
                Ok(()) => outcome.directories_removed += 1,
                Err(source) => {
                    warn!(path = %dir.display(), error = %source, "failed to remove directory");
                    outcome.errors.push(CleanupError::RemoveFailed {
                        path: dir.clone(),
                        source,
                    });
                }
            }
        }

        events.send(Event::Cleanup(CleanupEvent::Completed {
            files_removed: outcome.files_removed,
            directories_removed: outcome.directories_removed,
        }));

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use tempfile::TempDir;

    fn run(root: &Path, duplicates: HashSet<PathBuf>) -> CleanupOutcome {
        let plan = CleanupPlanner::plan(root, &duplicates);
        CleanupPlanner::execute(&plan, &null_sender())
    }

    #[test]
    fn duplicates_are_removed() {
        let root = TempDir::new().unwrap();
        let keep = root.path().join("keep.txt");
        let dup = root.path().join("dup.txt");
        fs::write(&keep, "x").unwrap();
        fs::write(&dup, "x").unwrap();

        let outcome = run(root.path(), HashSet::from([dup.clone()]));

        assert_eq!(outcome.files_removed, 1);
        assert!(keep.exists());
        assert!(!dup.exists());
    }

    #[test]
    fn marker_files_are_removed_everywhere() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("photos");
        fs::create_dir(&nested).unwrap();
        fs::write(root.path().join(".DS_Store"), "").unwrap();
        fs::write(nested.join(".DS_Store"), "").unwrap();

        let outcome = run(root.path(), HashSet::new());

        assert_eq!(outcome.files_removed, 2);
        assert!(!root.path().join(".DS_Store").exists());
        // The nested dir held only a marker, so it goes too
        assert!(!nested.exists());
    }

    #[test]
    fn empty_directories_are_removed_bottom_up() {
        let root = TempDir::new().unwrap();
        let deep = root.path().join("a/b/c");
        fs::create_dir_all(&deep).unwrap();

        let plan = CleanupPlanner::plan(root.path(), &HashSet::new());
        // Children scheduled before parents
        assert_eq!(
            plan.directories,
            vec![
                root.path().join("a/b/c"),
                root.path().join("a/b"),
                root.path().join("a"),
            ]
        );

        let outcome = CleanupPlanner::execute(&plan, &null_sender());
        assert_eq!(outcome.directories_removed, 3);
        assert!(!root.path().join("a").exists());
        assert!(root.path().exists());
    }

    #[test]
    fn directory_with_surviving_file_is_kept() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("mixed");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "x").unwrap();
        fs::write(dir.join("dup.txt"), "x").unwrap();

        let outcome = run(root.path(), HashSet::from([dir.join("dup.txt")]));

        assert_eq!(outcome.files_removed, 1);
        assert_eq!(outcome.directories_removed, 0);
        assert!(dir.join("keep.txt").exists());
    }

    #[test]
    fn directory_emptied_only_by_removals_is_scheduled() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("dups");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "x").unwrap();
        fs::write(dir.join(".DS_Store"), "").unwrap();

        let outcome = run(root.path(), HashSet::from([dir.join("a.txt")]));

        assert_eq!(outcome.files_removed, 2);
        assert_eq!(outcome.directories_removed, 1);
        assert!(!dir.exists());
    }

    #[test]
    fn root_is_never_scheduled() {
        let root = TempDir::new().unwrap();
        let plan = CleanupPlanner::plan(root.path(), &HashSet::new());
        assert!(plan.directories.is_empty());
        assert!(root.path().exists());
    }
}

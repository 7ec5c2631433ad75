//! # Grouper Module
//!
//! Partitions classified files into unique representatives and duplicate
//! sets under the signature engine's similarity rule.
//!
//! ## How It Works
//! - Exact signatures: a digest seen before marks the file as a duplicate
//!   of the first file that produced it.
//! - Perceptual signatures: each new file is compared against every
//!   canonical digest seen so far; the first one within the Hamming
//!   threshold wins. Linear in the number of canonicals, which is bounded
//!   by the number of visually distinct images rather than total file count.
//! - Files without a signature are never grouped; they pass through as
//!   unique.
//!
//! The first-seen member of a group (in caller-supplied order) is always
//! the canonical survivor, so callers wanting determinism should supply a
//! stable, timestamp- or path-sorted order.

use crate::core::signature::{PerceptualDigest, Signature};
use crate::core::ClassifiedFile;
use crate::events::{Event, EventSender, GroupEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A group of files with equivalent content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The first-seen member; retained and relocated
    pub canonical: PathBuf,
    /// Later members; excluded from relocation, deleted during cleanup
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Total members including the canonical
    pub fn member_count(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Whether any duplicate has attached to the canonical yet
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Outcome of duplicate grouping.
#[derive(Debug)]
pub struct GroupOutcome {
    /// One file per equivalence class, in input order; these get relocated
    pub unique: Vec<ClassifiedFile>,
    /// Groups that collected at least one duplicate
    pub groups: Vec<DuplicateGroup>,
}

impl GroupOutcome {
    /// All duplicate paths across all groups
    pub fn duplicate_paths(&self) -> Vec<PathBuf> {
        self.groups
            .iter()
            .flat_map(|g| g.duplicates.iter().cloned())
            .collect()
    }
}

/// Configuration for the duplicate grouper
#[derive(Debug, Clone)]
pub struct GrouperConfig {
    /// Maximum Hamming distance for two perceptual digests to be duplicates.
    /// 0 means exact perceptual match only.
    pub perceptual_threshold: u32,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            perceptual_threshold: 0,
        }
    }
}

/// Groups files into duplicate sets.
pub struct DuplicateGrouper {
    config: GrouperConfig,
}

impl DuplicateGrouper {
    /// Create a grouper with the given configuration
    pub fn new(config: GrouperConfig) -> Self {
        Self { config }
    }

    /// Partition `files` into unique representatives and duplicate groups.
    ///
    /// Input order decides canonicals: the first file carrying a given
    /// signature survives, later matches become duplicates.
    pub fn group(&self, files: Vec<ClassifiedFile>, events: &EventSender) -> GroupOutcome {
        events.send(Event::Group(GroupEvent::Started {
            total_files: files.len(),
        }));

        let mut unique = Vec::new();
        let mut groups: Vec<DuplicateGroup> = Vec::new();

        // Exact digests: digest -> group index
        let mut exact_seen: HashMap<String, usize> = HashMap::new();
        // Perceptual digests: every canonical seen so far, scanned linearly
        let mut perceptual_seen: Vec<(PerceptualDigest, usize)> = Vec::new();

        for file in files {
            let group_index = match &file.signature {
                None => None,
                Some(Signature::Exact(digest)) => match exact_seen.get(digest) {
                    Some(&index) => Some(index),
                    None => {
                        exact_seen.insert(digest.clone(), groups.len());
                        groups.push(DuplicateGroup {
                            canonical: file.record.path.clone(),
                            duplicates: Vec::new(),
                        });
                        unique.push(file);
                        continue;
                    }
                },
                Some(Signature::Perceptual(digest)) => {
                    // First canonical within the threshold wins
                    let found = perceptual_seen
                        .iter()
                        .find(|(seen, _)| seen.distance(digest) <= self.config.perceptual_threshold)
                        .map(|(_, index)| *index);

                    match found {
                        Some(index) => Some(index),
                        None => {
                            perceptual_seen.push((*digest, groups.len()));
                            groups.push(DuplicateGroup {
                                canonical: file.record.path.clone(),
                                duplicates: Vec::new(),
                            });
                            unique.push(file);
                            continue;
                        }
                    }
                }
            };

            match group_index {
                Some(index) => {
                    events.send(Event::Group(GroupEvent::DuplicateFound {
                        canonical: groups[index].canonical.clone(),
                        duplicate: file.record.path.clone(),
                    }));
                    groups[index].duplicates.push(file.record.path.clone());
                }
                // No signature: keep the file, but never group it
                None => unique.push(file),
            }
        }

        // Only groups that actually collected duplicates are interesting
        let groups: Vec<DuplicateGroup> = groups.into_iter().filter(|g| g.has_duplicates()).collect();

        events.send(Event::Group(GroupEvent::Completed {
            unique_files: unique.len(),
            duplicate_files: groups.iter().map(|g| g.duplicates.len()).sum(),
        }));

        GroupOutcome { unique, groups }
    }
}

impl Default for DuplicateGrouper {
    fn default() -> Self {
        Self::new(GrouperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::Category;
    use crate::core::scanner::FileRecord;
    use crate::events::null_sender;

    fn file(path: &str, signature: Option<Signature>) -> ClassifiedFile {
        ClassifiedFile {
            record: FileRecord {
                path: PathBuf::from(path),
                extension: "txt".to_string(),
                size: 1,
                timestamp: None,
            },
            category: Category::Notes,
            signature,
        }
    }

    fn exact(digest: &str) -> Option<Signature> {
        Some(Signature::Exact(digest.to_string()))
    }

    fn perceptual(bits: u64) -> Option<Signature> {
        Some(Signature::Perceptual(PerceptualDigest::from_bits(bits)))
    }

    #[test]
    fn empty_input_produces_empty_outcome() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(vec![], &null_sender());
        assert!(outcome.unique.is_empty());
        assert!(outcome.groups.is_empty());
    }

    #[test]
    fn first_seen_is_canonical() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(
            vec![
                file("/a.txt", exact("d1")),
                file("/b.txt", exact("d1")),
                file("/c.txt", exact("d1")),
            ],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.unique[0].record.path, PathBuf::from("/a.txt"));
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.groups[0].canonical, PathBuf::from("/a.txt"));
        assert_eq!(outcome.groups[0].duplicates.len(), 2);
    }

    #[test]
    fn distinct_digests_stay_unique() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(
            vec![file("/a.txt", exact("d1")), file("/b.txt", exact("d2"))],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 2);
        assert!(outcome.groups.is_empty());
    }

    #[test]
    fn unsigned_files_pass_through() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(
            vec![file("/a.txt", None), file("/b.txt", None)],
            &null_sender(),
        );

        // Both kept, neither grouped, even though both lack a signature
        assert_eq!(outcome.unique.len(), 2);
        assert!(outcome.groups.is_empty());
    }

    #[test]
    fn perceptual_threshold_zero_requires_exact_match() {
        let grouper = DuplicateGrouper::new(GrouperConfig {
            perceptual_threshold: 0,
        });
        let outcome = grouper.group(
            vec![
                file("/a.jpg", perceptual(0b1111)),
                file("/b.jpg", perceptual(0b1110)),
            ],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 2);
        assert!(outcome.groups.is_empty());
    }

    #[test]
    fn perceptual_threshold_one_groups_near_matches() {
        let grouper = DuplicateGrouper::new(GrouperConfig {
            perceptual_threshold: 1,
        });
        let outcome = grouper.group(
            vec![
                file("/a.jpg", perceptual(0b1111)),
                file("/b.jpg", perceptual(0b1110)),
            ],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.groups[0].canonical, PathBuf::from("/a.jpg"));
    }

    #[test]
    fn raising_threshold_only_merges_groups() {
        let files = || {
            vec![
                file("/a.jpg", perceptual(0b0000)),
                file("/b.jpg", perceptual(0b0001)),
                file("/c.jpg", perceptual(0b0011)),
            ]
        };

        let count_at = |threshold| {
            let grouper = DuplicateGrouper::new(GrouperConfig {
                perceptual_threshold: threshold,
            });
            grouper.group(files(), &null_sender()).unique.len()
        };

        // Strictly fewer or equal unique files as the threshold rises
        assert!(count_at(0) >= count_at(1));
        assert!(count_at(1) >= count_at(2));
        assert!(count_at(2) >= count_at(64));
        assert_eq!(count_at(64), 1);
    }

    #[test]
    fn first_perceptual_match_wins() {
        // /b.jpg sits 3 bits from /a.jpg, past the threshold, so both are
        // canonicals; /c.jpg is within threshold of /a.jpg only and must
        // attach there
        let grouper = DuplicateGrouper::new(GrouperConfig {
            perceptual_threshold: 2,
        });
        let outcome = grouper.group(
            vec![
                file("/a.jpg", perceptual(0b0000)),
                file("/b.jpg", perceptual(0b1110_0000)),
                file("/c.jpg", perceptual(0b0001)),
            ],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 2);
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.groups[0].canonical, PathBuf::from("/a.jpg"));
        assert_eq!(outcome.groups[0].duplicates, vec![PathBuf::from("/c.jpg")]);
    }

    #[test]
    fn exact_and_perceptual_kinds_never_mix() {
        let grouper = DuplicateGrouper::new(GrouperConfig {
            perceptual_threshold: 64,
        });
        let outcome = grouper.group(
            vec![
                file("/a.txt", exact("00")),
                file("/b.jpg", perceptual(0)),
            ],
            &null_sender(),
        );

        assert_eq!(outcome.unique.len(), 2);
        assert!(outcome.groups.is_empty());
    }

    #[test]
    fn surviving_groups_always_have_duplicates() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(
            vec![
                file("/a.txt", exact("d1")),
                file("/b.txt", exact("d1")),
                file("/c.txt", exact("d2")),
            ],
            &null_sender(),
        );

        // Canonical-only groups are filtered out of the outcome
        assert_eq!(outcome.groups.len(), 1);
        assert!(outcome.groups[0].has_duplicates());
        assert_eq!(outcome.groups[0].member_count(), 2);
    }

    #[test]
    fn duplicate_paths_collects_across_groups() {
        let grouper = DuplicateGrouper::default();
        let outcome = grouper.group(
            vec![
                file("/a.txt", exact("d1")),
                file("/b.txt", exact("d1")),
                file("/c.txt", exact("d2")),
                file("/d.txt", exact("d2")),
            ],
            &null_sender(),
        );

        let mut paths = outcome.duplicate_paths();
        paths.sort();
        assert_eq!(paths, vec![PathBuf::from("/b.txt"), PathBuf::from("/d.txt")]);
    }
}

//! Pipeline execution implementation.

use crate::core::allocator::{
    AllocatorConfig, BatchAllocator, NumberingMode, DEFAULT_BATCH_CAPACITY,
};
use crate::core::classifier::{CategoryResolver, ClassifierConfig};
use crate::core::cleanup::CleanupPlanner;
use crate::core::grouper::{DuplicateGroup, DuplicateGrouper, GrouperConfig};
use crate::core::relocate::{
    OperationMode, PlannedMove, RelocationExecutor, RelocationPlan,
};
use crate::core::scanner::{ScanConfig, SourceScanner, WalkDirScanner};
use crate::core::signature::{SignatureConfig, SignatureEngine};
use crate::core::ClassifiedFile;
use crate::error::{Result, SorterError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary, SignEvent,
    SignProgress,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// All duplicate groups found
    pub groups: Vec<DuplicateGroup>,
    /// Total files discovered in the source tree
    pub total_files: usize,
    /// The relocation plan that was (or, on a dry run, would be) executed
    pub plan: RelocationPlan,
    /// Files moved into batch folders
    pub relocated: usize,
    /// Files removed during cleanup (duplicates and markers)
    pub files_removed: usize,
    /// Emptied directories removed during cleanup
    pub directories_removed: usize,
    /// Whether this was a dry run (plan only, nothing touched)
    pub dry_run: bool,
    /// Non-fatal errors encountered along the way
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source tree to sort
    pub source: PathBuf,
    /// Destination root for batch folders
    pub destination: PathBuf,
    /// Maximum files per batch folder
    pub batch_capacity: usize,
    /// Hamming threshold for perceptual duplicate matching
    pub perceptual_threshold: u32,
    /// Fresh or resumed batch numbering
    pub numbering: NumberingMode,
    /// Move files or copy them
    pub operation: OperationMode,
    /// Plan everything but touch nothing
    pub dry_run: bool,
    /// A `.pdf` with more pages than this sorts as an ebook
    pub ebook_page_threshold: usize,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            perceptual_threshold: 0,
            numbering: NumberingMode::Fresh,
            operation: OperationMode::Move,
            dry_run: false,
            ebook_page_threshold: ClassifierConfig::default().ebook_page_threshold,
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the source tree to sort
    pub fn source(mut self, source: PathBuf) -> Self {
        self.config.source = source;
        self
    }

    /// Set the destination root
    pub fn destination(mut self, destination: PathBuf) -> Self {
        self.config.destination = destination;
        self
    }

    /// Set the batch folder capacity
    pub fn batch_capacity(mut self, capacity: usize) -> Self {
        self.config.batch_capacity = capacity;
        self
    }

    /// Set the perceptual matching threshold
    pub fn perceptual_threshold(mut self, threshold: u32) -> Self {
        self.config.perceptual_threshold = threshold;
        self
    }

    /// Set the batch numbering mode
    pub fn numbering(mut self, numbering: NumberingMode) -> Self {
        self.config.numbering = numbering;
        self
    }

    /// Move or copy files
    pub fn operation(mut self, operation: OperationMode) -> Self {
        self.config.operation = operation;
        self
    }

    /// Plan without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set the ebook page threshold
    pub fn ebook_page_threshold(mut self, pages: usize) -> Self {
        self.config.ebook_page_threshold = pages;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The file sorting pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let mut errors = Vec::new();

        self.validate()?;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.source, events)?;

        for error in scan_result.errors {
            errors.push(error.to_string());
        }

        let files = scan_result.files;
        let total_files = files.len();

        if files.is_empty() {
            return Ok(self.finish(
                events,
                PipelineResult {
                    groups: Vec::new(),
                    total_files: 0,
                    plan: RelocationPlan::default(),
                    relocated: 0,
                    files_removed: 0,
                    directories_removed: 0,
                    dry_run: self.config.dry_run,
                    errors,
                    duration_ms: start_time.elapsed().as_millis() as u64,
                },
            ));
        }

        // Phase 2: Signing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Signing,
        }));
        events.send(Event::Sign(SignEvent::Started { total_files }));

        let resolver = CategoryResolver::new(ClassifierConfig {
            ebook_page_threshold: self.config.ebook_page_threshold,
        });
        let engine = SignatureEngine::new(SignatureConfig::default());

        let mut classified = Vec::with_capacity(files.len());
        let mut unreadable = 0usize;

        for (i, record) in files.into_iter().enumerate() {
            events.send(Event::Sign(SignEvent::Progress(SignProgress {
                completed: i + 1,
                total: total_files,
                current_path: record.path.clone(),
            })));

            let category = resolver.resolve(&record.path);

            // A failed signature excludes the file from dedup, never from
            // the run
            let signature = match engine.sign(&record.path) {
                Ok(signature) => {
                    events.send(Event::Sign(SignEvent::FileSigned {
                        path: record.path.clone(),
                        category: category.to_string(),
                    }));
                    Some(signature)
                }
                Err(error) => {
                    unreadable += 1;
                    events.send(Event::Sign(SignEvent::Unreadable {
                        path: record.path.clone(),
                        message: error.to_string(),
                    }));
                    errors.push(error.to_string());
                    None
                }
            };

            classified.push(ClassifiedFile {
                record,
                category,
                signature,
            });
        }

        events.send(Event::Sign(SignEvent::Completed {
            total_signed: total_files - unreadable,
            unreadable,
        }));

        // Phase 3: Grouping
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Grouping,
        }));

        let grouper = DuplicateGrouper::new(GrouperConfig {
            perceptual_threshold: self.config.perceptual_threshold,
        });
        let outcome = grouper.group(classified, events);
        let duplicates: HashSet<PathBuf> = outcome.duplicate_paths().into_iter().collect();

        // Phase 4: Relocating
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Relocating,
        }));

        let mut allocator = BatchAllocator::new(AllocatorConfig {
            destination: self.config.destination.clone(),
            capacity: self.config.batch_capacity,
            numbering: self.config.numbering,
        });

        let mut plan = RelocationPlan::default();
        for file in &outcome.unique {
            if let Some(filename) = file.record.path.file_name() {
                plan.moves.push(PlannedMove {
                    source: file.record.path.clone(),
                    destination: allocator.allocate(file.category, filename),
                    category: file.category,
                });
            }
        }

        if self.config.dry_run {
            info!(moves = plan.len(), "dry run, stopping before execution");
            return Ok(self.finish(
                events,
                PipelineResult {
                    groups: outcome.groups,
                    total_files,
                    plan,
                    relocated: 0,
                    files_removed: 0,
                    directories_removed: 0,
                    dry_run: true,
                    errors,
                    duration_ms: start_time.elapsed().as_millis() as u64,
                },
            ));
        }

        let relocation = RelocationExecutor::new(self.config.operation).execute(&plan, events);
        for error in &relocation.errors {
            errors.push(error.to_string());
        }

        // Phase 5: Cleaning. Copy mode leaves the source tree untouched,
        // including its duplicates.
        let (files_removed, directories_removed) = if self.config.operation == OperationMode::Move
        {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Cleaning,
            }));

            let cleanup_plan = CleanupPlanner::plan(&self.config.source, &duplicates);
            let cleanup = CleanupPlanner::execute(&cleanup_plan, events);
            for error in &cleanup.errors {
                errors.push(error.to_string());
            }
            (cleanup.files_removed, cleanup.directories_removed)
        } else {
            (0, 0)
        };

        Ok(self.finish(
            events,
            PipelineResult {
                groups: outcome.groups,
                total_files,
                plan,
                relocated: relocation.relocated.len(),
                files_removed,
                directories_removed,
                dry_run: false,
                errors,
                duration_ms: start_time.elapsed().as_millis() as u64,
            },
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.config.source.as_os_str().is_empty() {
            return Err(SorterError::Config("source directory not set".to_string()));
        }
        if self.config.destination.as_os_str().is_empty() {
            return Err(SorterError::Config(
                "destination directory not set".to_string(),
            ));
        }
        if self.config.batch_capacity == 0 {
            return Err(SorterError::Config(
                "batch capacity must be at least 1".to_string(),
            ));
        }
        // Sorting a tree into itself would rediscover relocated files
        if self.config.destination.starts_with(&self.config.source) {
            return Err(SorterError::Config(
                "destination must not be inside the source tree".to_string(),
            ));
        }
        Ok(())
    }

    fn finish(&self, events: &EventSender, result: PipelineResult) -> PipelineResult {
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_files: result.total_files,
                duplicate_groups: result.groups.len(),
                duplicate_count: result.groups.iter().map(|g| g.duplicates.len()).sum(),
                relocated: result.relocated,
                duration_ms: result.duration_ms,
            },
        }));
        result
    }
}

//! # CLI Module
//!
//! Command-line interface for the batch file sorter.
//!
//! ## Usage
//! ```bash
//! # Sort a directory into batch folders
//! tidybatch sort ~/inbox ~/sorted
//!
//! # Smaller batches, near-duplicate image matching
//! tidybatch sort ~/inbox ~/sorted --max-per-folder 100 --threshold 4
//!
//! # Continue numbering from an earlier run
//! tidybatch sort ~/inbox ~/sorted --numbering resume
//!
//! # See the plan without touching anything
//! tidybatch sort ~/inbox ~/sorted --dry-run --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use tidybatch::core::allocator::{NumberingMode, DEFAULT_BATCH_CAPACITY};
use tidybatch::core::pipeline::{Pipeline, PipelineResult};
use tidybatch::core::relocate::OperationMode;
use tidybatch::error::Result;
use tidybatch::events::{Event, EventChannel, PipelineEvent, ScanEvent, SignEvent};

/// tidybatch - Sort files into deduplicated, capacity-bounded batches
#[derive(Parser, Debug)]
#[command(name = "tidybatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort a source tree into categorized batch folders
    Sort {
        /// Directory to sort
        source: PathBuf,

        /// Destination root for batch folders
        destination: PathBuf,

        /// Maximum files per batch folder
        #[arg(long, default_value_t = DEFAULT_BATCH_CAPACITY)]
        max_per_folder: usize,

        /// Image similarity threshold (0 = identical, higher = looser, 0-64)
        #[arg(short, long, default_value = "0")]
        threshold: u32,

        /// Batch numbering mode
        #[arg(long, default_value = "fresh")]
        numbering: Numbering,

        /// Copy files instead of moving them (source tree stays intact)
        #[arg(long)]
        copy: bool,

        /// Plan everything but touch nothing
        #[arg(long)]
        dry_run: bool,

        /// A PDF with more pages than this sorts as an ebook
        #[arg(long, default_value = "5")]
        ebook_pages: usize,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Numbering {
    /// Start at batch_001
    Fresh,
    /// Continue after the highest existing batch per category
    Resume,
}

impl From<Numbering> for NumberingMode {
    fn from(mode: Numbering) -> Self {
        match mode {
            Numbering::Fresh => NumberingMode::Fresh,
            Numbering::Resume => NumberingMode::Resume,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (one move per line)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    tidybatch::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sort {
            source,
            destination,
            max_per_folder,
            threshold,
            numbering,
            copy,
            dry_run,
            ebook_pages,
            output,
            include_hidden,
            verbose,
        } => run_sort(SortArgs {
            source,
            destination,
            max_per_folder,
            threshold,
            numbering: numbering.into(),
            operation: if copy {
                OperationMode::Copy
            } else {
                OperationMode::Move
            },
            dry_run,
            ebook_pages,
            output,
            include_hidden,
            verbose,
        }),
    }
}

struct SortArgs {
    source: PathBuf,
    destination: PathBuf,
    max_per_folder: usize,
    threshold: u32,
    numbering: NumberingMode,
    operation: OperationMode,
    dry_run: bool,
    ebook_pages: usize,
    output: OutputFormat,
    include_hidden: bool,
    verbose: bool,
}

fn run_sort(args: SortArgs) -> Result<()> {
    let term = Term::stderr();

    if matches!(args.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("tidybatch").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .source(args.source.clone())
        .destination(args.destination.clone())
        .batch_capacity(args.max_per_folder)
        .perceptual_threshold(args.threshold)
        .numbering(args.numbering)
        .operation(args.operation)
        .dry_run(args.dry_run)
        .ebook_page_threshold(args.ebook_pages)
        .include_hidden(args.include_hidden)
        .build();

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(args.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose_clone = args.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_files as u64);
                    }
                }
                Event::Sign(SignEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose_clone {
                            pb.set_message(
                                p.current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                                    .to_string(),
                            );
                        }
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, args.verbose),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line("").ok();

    if result.dry_run {
        term.write_line(&format!(
            "{} Dry Run Complete (nothing was moved)",
            style("✓").green().bold()
        ))
        .ok();
    } else {
        term.write_line(&format!("{} Sort Complete", style("✓").green().bold()))
            .ok();
    }
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {:.1}s",
        style(result.total_files).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    let duplicate_count: usize = result.groups.iter().map(|g| g.duplicates.len()).sum();
    term.write_line(&format!(
        "  {} duplicate groups ({} files)",
        style(result.groups.len()).cyan(),
        style(duplicate_count).cyan()
    ))
    .ok();

    if result.dry_run {
        term.write_line(&format!(
            "  {} moves planned",
            style(result.plan.len()).cyan()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "  {} files relocated",
            style(result.relocated).cyan()
        ))
        .ok();
        term.write_line(&format!(
            "  {} files and {} folders cleaned up",
            style(result.files_removed).cyan(),
            style(result.directories_removed).cyan()
        ))
        .ok();
    }

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} files skipped ({})",
            style(result.errors.len()).yellow(),
            style("see --verbose for details").dim()
        ))
        .ok();

        if verbose {
            for error in &result.errors {
                term.write_line(&format!("    {} {}", style("!").yellow(), error))
                    .ok();
            }
        }
    }

    if verbose && !result.groups.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
            .ok();
        term.write_line("").ok();

        for (i, group) in result.groups.iter().enumerate() {
            term.write_line(&format!(
                "  {} ({} files)",
                style(format!("Group {}:", i + 1)).bold(),
                group.member_count()
            ))
            .ok();
            term.write_line(&format!(
                "    {} {}",
                style("★").green(),
                group.canonical.display()
            ))
            .ok();
            for duplicate in &group.duplicates {
                term.write_line(&format!("    {} {}", style("○").dim(), duplicate.display()))
                    .ok();
            }
        }
    }

    if verbose && result.dry_run {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Planned Moves:").bold().underlined()))
            .ok();
        for planned in &result.plan.moves {
            term.write_line(&format!(
                "  {} {} {}",
                planned.source.display(),
                style("->").dim(),
                planned.destination.display()
            ))
            .ok();
        }
    }
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "total_files": result.total_files,
        "duplicate_groups": result.groups.len(),
        "duplicate_count": result.groups.iter().map(|g| g.duplicates.len()).sum::<usize>(),
        "relocated": result.relocated,
        "files_removed": result.files_removed,
        "directories_removed": result.directories_removed,
        "dry_run": result.dry_run,
        "duration_ms": result.duration_ms,
        "errors": result.errors,
        "groups": result.groups,
        "moves": result.plan.moves,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal_results(result: &PipelineResult) {
    for planned in &result.plan.moves {
        println!(
            "{} -> {}",
            planned.source.display(),
            planned.destination.display()
        );
    }
}

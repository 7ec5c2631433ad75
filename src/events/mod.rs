//! # Events Module
//!
//! Progress reporting from the core engine to any presentation layer.
//!
//! Every pipeline phase emits events over a channel; consumers (the CLI
//! progress bar, tests) subscribe via an [`EventReceiver`]. Dropping the
//! receiver silently disables reporting, so the core never blocks on a
//! slow or absent UI.

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::{
    CleanupEvent, Event, GroupEvent, PipelineEvent, PipelinePhase, PipelineSummary,
    RelocateEvent, ScanEvent, ScanProgress, SignEvent, SignProgress,
};

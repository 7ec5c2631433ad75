//! PDF page counting.
//!
//! A PDF that fails to parse counts as 0 pages, which keeps it in the
//! `pdfs` category instead of failing the run.

use std::path::Path;
use tracing::debug;

/// Number of pages in a PDF, or 0 if the file cannot be parsed.
pub fn page_count(path: &Path) -> usize {
    match lopdf::Document::load(path) {
        Ok(doc) => doc.get_pages().len(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "pdf parse failed, assuming 0 pages");
            0
        }
    }
}

//! # Classifier Module
//!
//! Maps a file to a content category.
//!
//! ## Rules
//! 1. Extension decides the base category via a static table; unknown
//!    extensions fall back to `other`.
//! 2. `.pdf` is overridden by page count: more than the configured page
//!    threshold means `ebooks`, otherwise `pdfs`. A file that cannot be
//!    parsed counts as 0 pages.
//! 3. Web-like files (`.html`, `.htm`, `.url`, `.webloc`) are sniffed for
//!    bookmark-export markers and become `bookmarks` or `web`.
//!
//! Classification is a pure function of (extension, content): no state, no
//! writes, and no dependence on the order files are visited.

mod bookmarks;
mod pdf;

pub use bookmarks::is_bookmark_file;
pub use pdf::page_count;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content categories a file can be sorted into.
///
/// `as_str` yields the destination folder label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Documents,
    Spreadsheets,
    Presentations,
    Notes,
    Web,
    Bookmarks,
    Archives,
    Images,
    Audio,
    Video,
    Code,
    Config,
    Database,
    Ebooks,
    Pdfs,
    Other,
}

impl Category {
    /// Base category from a lowercase file extension (no leading dot).
    ///
    /// This is the static table; the pdf and bookmark overrides live in
    /// [`CategoryResolver::resolve`].
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "doc" | "docx" | "pages" | "odt" => Category::Documents,
            "xls" | "xlsx" | "xlsm" | "numbers" | "ods" | "csv" => Category::Spreadsheets,
            "ppt" | "pptx" | "key" | "odp" | "keynote" => Category::Presentations,
            "txt" | "md" | "rtf" | "log" | "mm" => Category::Notes,
            "html" | "htm" | "mht" | "url" | "webloc" => Category::Web,
            "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" => Category::Archives,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "tif" | "webp" | "svg" | "heic"
            | "heif" => Category::Images,
            "mp3" | "wav" | "aac" | "m4a" | "ogg" | "flac" => Category::Audio,
            "mp4" | "mov" | "avi" | "mkv" | "wmv" | "flv" | "webm" | "mpg" | "mpeg" | "m4v" => {
                Category::Video
            }
            "py" | "js" | "java" | "cpp" | "c" | "h" | "css" | "php" | "rb" | "swift" | "go"
            | "rs" => Category::Code,
            "json" | "xml" | "yaml" | "yml" | "ini" | "conf" | "env" => Category::Config,
            "sql" | "db" | "sqlite" | "sqlite3" => Category::Database,
            "pdf" => Category::Pdfs,
            _ => Category::Other,
        }
    }

    /// The destination folder label for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Documents => "documents",
            Category::Spreadsheets => "spreadsheets",
            Category::Presentations => "presentations",
            Category::Notes => "notes",
            Category::Web => "web",
            Category::Bookmarks => "bookmarks",
            Category::Archives => "archives",
            Category::Images => "images",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Code => "code",
            Category::Config => "config",
            Category::Database => "database",
            Category::Ebooks => "ebooks",
            Category::Pdfs => "pdfs",
            Category::Other => "other",
        }
    }

    /// All extensions known to the static table.
    ///
    /// The scanner uses this set to filter traversal; matching is
    /// case-insensitive because some filesystems are case-sensitive.
    pub fn known_extensions() -> &'static [&'static str] {
        &[
            "doc", "docx", "pages", "odt", "xls", "xlsx", "xlsm", "numbers", "ods", "csv", "ppt",
            "pptx", "key", "odp", "keynote", "txt", "md", "rtf", "log", "mm", "html", "htm",
            "mht", "url", "webloc", "zip", "rar", "7z", "tar", "gz", "bz2", "jpg", "jpeg", "png",
            "gif", "bmp", "tiff", "tif", "webp", "svg", "heic", "heif", "mp3", "wav", "aac",
            "m4a", "ogg", "flac", "mp4", "mov", "avi", "mkv", "wmv", "flv", "webm", "mpg",
            "mpeg", "m4v", "py", "js", "java", "cpp", "c", "h", "css", "php", "rb", "swift",
            "go", "rs", "json", "xml", "yaml", "yml", "ini", "conf", "env", "sql", "db",
            "sqlite", "sqlite3", "pdf",
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the category resolver
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// A `.pdf` with more pages than this is an ebook
    pub ebook_page_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ebook_page_threshold: 5,
        }
    }
}

/// Resolves a file into a [`Category`], applying content overrides.
pub struct CategoryResolver {
    config: ClassifierConfig,
}

impl CategoryResolver {
    /// Create a resolver with the given configuration
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Resolve the category for a file.
    ///
    /// Never fails: parse problems degrade to the safe default (`pdfs` for
    /// an unreadable PDF, the filename heuristic for unparsable markup).
    pub fn resolve(&self, path: &Path) -> Category {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => {
                if pdf::page_count(path) > self.config.ebook_page_threshold {
                    Category::Ebooks
                } else {
                    Category::Pdfs
                }
            }
            "html" | "htm" | "url" | "webloc" => {
                if bookmarks::is_bookmark_file(path) {
                    Category::Bookmarks
                } else {
                    Category::Web
                }
            }
            _ => Category::from_extension(&ext),
        }
    }
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

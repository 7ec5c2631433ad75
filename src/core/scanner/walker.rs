//! Directory walking implementation using walkdir.

use super::{filter::ExtensionFilter, FileRecord, ScanResult, SourceScanner};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use chrono::NaiveDateTime;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use walkdir::WalkDir;

/// `YYYYMMDD-HHMMSS` prefix used by camera dumps and export tools
fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{8}-\d{6})").expect("valid regex"))
}

/// Parse the filename timestamp prefix, if present and valid.
pub(crate) fn extract_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let captures = timestamp_pattern().captures(filename)?;
    NaiveDateTime::parse_from_str(&captures[1], "%Y%m%d-%H%M%S").ok()
}

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use the category table)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            extensions: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ExtensionFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ExtensionFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    fn scan_root(
        &self,
        root: &PathBuf,
        events: Option<&EventSender>,
    ) -> Result<(Vec<FileRecord>, Vec<ScanError>), ScanError> {
        if !root.exists() || !root.is_dir() {
            return Err(ScanError::DirectoryNotFound { path: root.clone() });
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_dir() {
                        directories_scanned += 1;

                        if !self.config.include_hidden {
                            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                                if name.starts_with('.') && path != root.as_path() {
                                    continue;
                                }
                            }
                        }

                        if let Some(sender) = events {
                            sender.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                                directories_scanned,
                                files_found: files.len(),
                                current_path: path.to_path_buf(),
                            })));
                        }

                        continue;
                    }

                    if !self.filter.should_include(path) {
                        continue;
                    }

                    match fs::metadata(path) {
                        Ok(metadata) => {
                            let record = FileRecord {
                                path: path.to_path_buf(),
                                extension: path
                                    .extension()
                                    .and_then(|e| e.to_str())
                                    .map(|e| e.to_lowercase())
                                    .unwrap_or_default(),
                                size: metadata.len(),
                                timestamp: path
                                    .file_name()
                                    .and_then(|n| n.to_str())
                                    .and_then(extract_timestamp),
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::FileFound {
                                    path: record.path.clone(),
                                }));
                            }

                            files.push(record);
                        }
                        Err(e) => {
                            let error = ScanError::ReadDirectory {
                                path: path.to_path_buf(),
                                source: e,
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::Error {
                                    path: path.to_path_buf(),
                                    message: error.to_string(),
                                }));
                            }

                            errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    if let Some(sender) = events {
                        sender.send(Event::Scan(ScanEvent::Error {
                            path,
                            message: error.to_string(),
                        }));
                    }

                    errors.push(error);
                }
            }
        }

        // Stable order for the grouper: timestamp, then path
        files.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Ok((files, errors))
    }
}

impl SourceScanner for WalkDirScanner {
    fn scan(&self, root: &PathBuf) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        root: &PathBuf,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        events.send(Event::Scan(ScanEvent::Started { root: root.clone() }));

        let (files, errors) = self.scan_root(root, Some(events))?;

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        Ok(ScanResult { files, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"content").unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_finds_supported_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(&temp_dir, "notes.txt");
        create_file(&temp_dir, "report.PDF");
        create_file(&temp_dir, "binary.exe");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        create_file(&temp_dir, "root.txt");
        fs::write(subdir.join("nested.txt"), b"nested").unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn scan_excludes_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_file(&temp_dir, "visible.txt");
        create_file(&temp_dir, ".hidden.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("visible.txt"));
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&PathBuf::from("/nonexistent/path/12345"));

        assert!(result.is_err());
    }

    #[test]
    fn scan_orders_by_filename_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        create_file(&temp_dir, "20240601-120000_late.txt");
        create_file(&temp_dir, "20230101-080000_early.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].path.ends_with("20230101-080000_early.txt"));
    }

    #[test]
    fn extract_timestamp_parses_valid_prefix() {
        let ts = extract_timestamp("20240115-093000_photo.jpg").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 09:30:00");
    }

    #[test]
    fn extract_timestamp_rejects_garbage() {
        assert!(extract_timestamp("photo.jpg").is_none());
        assert!(extract_timestamp("2024-photo.jpg").is_none());
        // Matches the pattern but is not a real date
        assert!(extract_timestamp("99999999-999999_x.jpg").is_none());
    }
}

//! File filtering logic for the scanner.

use crate::core::classifier::Category;
use std::path::Path;

/// Filters files by extension against the category table.
pub struct ExtensionFilter {
    /// Lowercase extensions to include
    extensions: std::collections::HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ExtensionFilter {
    /// Create a new filter over all extensions the category table knows.
    pub fn new() -> Self {
        Self {
            extensions: Category::known_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.extensions.contains(&ext.to_lowercase())
        } else {
            false
        }
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new()
    }
}

//! # Signature Module
//!
//! Computes a comparable signature for a file, with a different algorithm
//! family per content class:
//!
//! | Content class      | Signature                                        |
//! |--------------------|--------------------------------------------------|
//! | Binary documents   | hex of the full byte content (exact equality)    |
//! | Text-like formats  | SHA-256 of whitespace-stripped, lowercased text  |
//! | Images             | 64-bit average hash (Hamming comparison)         |
//! | Other media        | SHA-256 over size + sampled chunks               |
//!
//! Any read or decode failure yields an error instead of a signature; such
//! files are excluded from duplicate detection but still classified and
//! relocated.

mod perceptual;
mod sampled;
mod text;

pub use perceptual::{average_hash, PerceptualDigest};

use crate::error::SignatureError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which algorithm family signs a file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// Office/PDF container formats: compared byte-for-byte
    BinaryDocument,
    /// Plain text, code, config, markup: compared after normalization
    Text,
    /// Raster images: compared perceptually
    Image,
    /// Video, audio, archives, databases: compared by sampled content
    Media,
}

impl ContentClass {
    /// Select the algorithm family for a lowercase extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "doc" | "rtf" | "docx" | "odt" | "pdf" | "pages" | "xls" | "xlsx" | "xlsm" | "ods"
            | "numbers" | "key" | "ppt" | "pptx" | "odp" | "keynote" => {
                ContentClass::BinaryDocument
            }
            "txt" | "md" | "log" | "mm" | "csv" | "json" | "xml" | "yaml" | "yml" | "ini"
            | "conf" | "env" | "sql" | "py" | "js" | "java" | "cpp" | "c" | "h" | "css"
            | "php" | "rb" | "swift" | "go" | "rs" | "html" | "htm" | "mht" | "url"
            | "webloc" => ContentClass::Text,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "tif" | "webp" | "svg" | "heic"
            | "heif" => ContentClass::Image,
            _ => ContentClass::Media,
        }
    }
}

/// A comparable content signature.
///
/// Two files are duplicates iff their signatures are the same variant and
/// match under that variant's rule: string equality for `Exact`, Hamming
/// distance within a threshold for `Perceptual`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signature {
    /// Hex digest (or hex content for binary documents); bitwise equality
    Exact(String),
    /// 64-bit perceptual digest; Hamming comparison
    Perceptual(PerceptualDigest),
}

impl Signature {
    /// Whether two signatures match under the given perceptual threshold.
    pub fn matches(&self, other: &Signature, threshold: u32) -> bool {
        match (self, other) {
            (Signature::Exact(a), Signature::Exact(b)) => a == b,
            (Signature::Perceptual(a), Signature::Perceptual(b)) => a.distance(b) <= threshold,
            _ => false,
        }
    }
}

/// Configuration for the signature engine
#[derive(Debug, Clone)]
pub struct SignatureConfig {
    /// Chunk size for sampled hashing of large media files
    pub sample_chunk_bytes: u64,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            sample_chunk_bytes: 1024 * 1024,
        }
    }
}

/// Computes signatures for files.
pub struct SignatureEngine {
    config: SignatureConfig,
}

impl SignatureEngine {
    /// Create an engine with the given configuration
    pub fn new(config: SignatureConfig) -> Self {
        Self { config }
    }

    /// Compute the signature for a file.
    ///
    /// The algorithm family is selected by extension; see [`ContentClass`].
    /// Errors mean "no signature": the caller should keep the file in the
    /// run but leave it out of duplicate detection.
    pub fn sign(&self, path: &Path) -> Result<Signature, SignatureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ContentClass::from_extension(&ext) {
            ContentClass::BinaryDocument => self.sign_binary(path),
            ContentClass::Text => self.sign_text(path),
            ContentClass::Image => {
                let digest = perceptual::hash_image_file(path)?;
                Ok(Signature::Perceptual(digest))
            }
            ContentClass::Media => {
                let digest = sampled::sampled_digest(path, self.config.sample_chunk_bytes)?;
                Ok(Signature::Exact(digest))
            }
        }
    }

    /// Binary documents: the signature is the hex encoding of the full
    /// content, so comparison is exact byte equality with no normalization.
    fn sign_binary(&self, path: &Path) -> Result<Signature, SignatureError> {
        let bytes = fs::read(path).map_err(|source| SignatureError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(SignatureError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        Ok(Signature::Exact(to_hex(&bytes)))
    }

    /// Text-like files: decode with encoding fallback, strip all whitespace,
    /// lowercase, and digest. Files differing only in whitespace, case, or
    /// line endings sign identically.
    fn sign_text(&self, path: &Path) -> Result<Signature, SignatureError> {
        let content = text::read_with_fallback(path)?;
        let normalized = text::normalize(&content);

        if normalized.is_empty() {
            return Err(SignatureError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        Ok(Signature::Exact(sha256_hex(normalized.as_bytes())))
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new(SignatureConfig::default())
    }
}

/// SHA-256 digest as a lowercase hex string.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    to_hex(&hasher.finalize())
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

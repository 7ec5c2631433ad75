//! Text reading with encoding fallback, and content normalization.
//!
//! Source trees accumulate text files in whatever encoding the exporting
//! tool used. Decoding tries the detected encoding first, then a fixed list
//! of common encodings, then permissive UTF-8 as a last resort, so no text
//! file is ever excluded from dedup just because of its encoding.

use crate::error::SignatureError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::fs;
use std::path::Path;

/// How many leading bytes to feed the encoding detector
const DETECT_SAMPLE_BYTES: usize = 4096;

/// Read a text file, trying detected and common encodings in order.
pub fn read_with_fallback(path: &Path) -> Result<String, SignatureError> {
    let bytes = fs::read(path).map_err(|source| SignatureError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(SignatureError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut candidates: Vec<&'static Encoding> = vec![detect_encoding(&bytes)];
    for enc in [UTF_8, WINDOWS_1252] {
        if !candidates.contains(&enc) {
            candidates.push(enc);
        }
    }

    for encoding in candidates {
        let (text, _, had_errors) = encoding.decode(&bytes);
        if !had_errors {
            return Ok(text.into_owned());
        }
    }

    // Last resort: permissive UTF-8 with replacement characters
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(DETECT_SAMPLE_BYTES)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// Normalize text for comparison: remove all whitespace and lowercase.
pub fn normalize(content: &str) -> String {
    content
        .split_whitespace()
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn normalize_strips_whitespace_and_case() {
        assert_eq!(normalize("Hello World"), "helloworld");
        assert_eq!(normalize("hello   world"), "helloworld");
        assert_eq!(normalize("HELLO\r\nWORLD\t"), "helloworld");
    }

    #[test]
    fn normalize_of_blank_content_is_empty() {
        assert_eq!(normalize("   \n\t  "), "");
    }

    #[test]
    fn reads_plain_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("utf8.txt");
        fs::write(&path, "héllo wörld").unwrap();

        assert_eq!(read_with_fallback(&path).unwrap(), "héllo wörld");
    }

    #[test]
    fn reads_latin1_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        // "héllo" in latin-1: 0xE9 is not valid UTF-8 on its own
        fs::write(&path, [b'h', 0xE9, b'l', b'l', b'o']).unwrap();

        let text = read_with_fallback(&path).unwrap();
        assert_eq!(text, "héllo");
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            read_with_fallback(&path),
            Err(SignatureError::EmptyFile { .. })
        ));
    }

    #[test]
    fn encoding_differences_normalize_away() {
        let dir = TempDir::new().unwrap();
        let utf8 = dir.path().join("a.txt");
        let latin1 = dir.path().join("b.txt");
        fs::write(&utf8, "Caf\u{e9} Menu").unwrap();
        fs::write(&latin1, [b'c', b'a', b'f', 0xE9, b' ', b'm', b'e', b'n', b'u']).unwrap();

        let a = normalize(&read_with_fallback(&utf8).unwrap());
        let b = normalize(&read_with_fallback(&latin1).unwrap());
        assert_eq!(a, b);
    }
}

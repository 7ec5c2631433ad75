//! 64-bit average hash for images.
//!
//! The hash works by:
//! 1. Resizing the image to 8x8
//! 2. Converting to grayscale
//! 3. Computing the average brightness
//! 4. For each pixel: if brighter than average, set bit to 1, else 0
//!
//! Visually similar images end up with a low Hamming distance between
//! their digests, so near-duplicate detection is a threshold comparison
//! rather than equality.

use crate::error::SignatureError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hash grid side length; 8x8 = 64 bits
const HASH_SIZE: u32 = 8;

/// A fixed-width perceptual digest of an image's appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualDigest {
    bits: u64,
}

impl PerceptualDigest {
    /// Create a digest from raw bits
    pub fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// The raw 64-bit value
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Hamming distance to another digest: the number of differing bits.
    /// Lower distance = more similar images.
    pub fn distance(&self, other: &Self) -> u32 {
        (self.bits ^ other.bits).count_ones()
    }

    /// The digest as a hexadecimal string
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.bits)
    }
}

/// Compute the average hash of an already-decoded image.
pub fn average_hash(image: &DynamicImage) -> PerceptualDigest {
    let resized = image.resize_exact(HASH_SIZE, HASH_SIZE, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();

    let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    let count = (HASH_SIZE * HASH_SIZE) as u64;
    let average = (total / count) as u8;

    let mut bits: u64 = 0;
    for y in 0..HASH_SIZE {
        for x in 0..HASH_SIZE {
            bits <<= 1;
            if gray.get_pixel(x, y)[0] > average {
                bits |= 1;
            }
        }
    }

    PerceptualDigest::from_bits(bits)
}

/// Decode an image file and compute its average hash.
pub fn hash_image_file(path: &Path) -> Result<PerceptualDigest, SignatureError> {
    let image = image::open(path).map_err(|e| SignatureError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(average_hash(&image))
}

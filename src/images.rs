//! Image intake pipeline
//!
//! Shared pre-processing in front of create and update: size checks, base64
//! encoding, content-type sniffing, and the per-listing count cap. Once a
//! file has passed through here it is a self-contained
//! [`ListingImage`](crate::core::listing::ListingImage) that any backend can
//! persist inline.

use crate::core::error::ImageError;
use crate::core::listing::ListingImage;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A raw input file as submitted by the sell form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Limits applied to every submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImagePolicy {
    /// Per-file byte limit. Defaults to 2 MiB.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Files retained per listing; extras beyond this are silently dropped.
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

fn default_max_bytes() -> u64 {
    2 * 1024 * 1024
}

fn default_max_images() -> usize {
    5
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            max_images: default_max_images(),
        }
    }
}

/// Run every file through the pipeline.
///
/// Fails on the first offending file: over-limit input is a
/// [`ImageError::TooLarge`], an empty body is [`ImageError::Unreadable`].
/// Files past the count cap are dropped, not rejected — the sell form caps
/// selection at the same number, so this only triggers for programmatic
/// callers.
pub fn process_images(
    files: &[ImageFile],
    policy: &ImagePolicy,
) -> Result<Vec<ListingImage>, ImageError> {
    if files.len() > policy.max_images {
        debug!(
            supplied = files.len(),
            kept = policy.max_images,
            "dropping images beyond the per-listing cap"
        );
    }

    files
        .iter()
        .take(policy.max_images)
        .map(|file| encode_image(file, policy))
        .collect()
}

fn encode_image(file: &ImageFile, policy: &ImagePolicy) -> Result<ListingImage, ImageError> {
    let size = file.bytes.len() as u64;
    if size > policy.max_bytes {
        return Err(ImageError::TooLarge {
            file_name: file.name.clone(),
            size,
            limit: policy.max_bytes,
        });
    }
    if file.bytes.is_empty() {
        return Err(ImageError::Unreadable {
            file_name: file.name.clone(),
            message: "empty file".to_string(),
        });
    }

    Ok(ListingImage {
        content_type: sniff_content_type(&file.bytes).to_string(),
        data: general_purpose::STANDARD.encode(&file.bytes),
        byte_len: file.bytes.len(),
    })
}

/// Identify the image format from magic bytes.
fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

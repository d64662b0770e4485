//! Shared test harness for storage backend testing
//!
//! Provides sample listings/drafts/files and the `listing_store_tests!`
//! contract macro.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! listing_store_tests!(my_fresh_store());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod listing_store_tests;

use bookswap::prelude::*;

/// A fake PNG body of the given size (valid magic bytes, zero padding).
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G'];
    bytes.resize(len, 0);
    bytes
}

/// An input file as the sell form would submit it.
pub fn png_file(name: &str, len: usize) -> ImageFile {
    ImageFile::new(name, png_bytes(len))
}

/// A complete, valid listing record with one inline image.
pub fn sample_listing(title: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: Uuid::new_v4(),
        owner: "ana".to_string(),
        title: title.to_string(),
        author: "Frank Herbert".to_string(),
        price: 120.0,
        condition: "good".to_string(),
        location: "Lisbon".to_string(),
        coordinates: None,
        phone: "9198765432".to_string(),
        images: vec![ListingImage {
            content_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
            byte_len: 5,
        }],
        created_at: now,
        updated_at: now,
    }
}

/// A valid sell-form draft.
pub fn sample_draft(title: &str) -> ListingDraft {
    ListingDraft {
        owner: "ana".to_string(),
        title: title.to_string(),
        author: "Frank Herbert".to_string(),
        price: 120.0,
        condition: "good".to_string(),
        location: "Lisbon".to_string(),
        coordinates: None,
        phone: "9198765432".to_string(),
    }
}

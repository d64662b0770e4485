//! Draft validation
//!
//! Presence and range checks only. All offending fields are collected into
//! one [`ValidationError`] so the sell form can mark every bad input at once
//! instead of failing on the first.

use crate::core::error::{FieldError, ValidationError};
use crate::core::listing::ListingDraft;

/// Validate a normalized draft.
///
/// `image_count` is the number of files supplied with this submission;
/// `require_images` is true on the create path (an edit may legitimately
/// supply none and keep the previous set).
pub fn validate_draft(
    draft: &ListingDraft,
    image_count: usize,
    require_images: bool,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if draft.title.is_empty() {
        errors.push(FieldError::new("title", "must not be empty"));
    }
    if draft.author.is_empty() {
        errors.push(FieldError::new("author", "must not be empty"));
    }
    if !draft.price.is_finite() {
        errors.push(FieldError::new("price", "must be a number"));
    } else if draft.price <= 0.0 {
        errors.push(FieldError::new("price", "must be positive"));
    }
    if require_images && image_count == 0 {
        errors.push(FieldError::new("images", "at least one image is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

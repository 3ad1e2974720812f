//! Shared constants for the container format
//!
//! Unit conversion lives here because both the codec (page size metadata)
//! and the renderer (page box dimensions) need the same factor.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Centimeters per PDF point (1 point = 1/72 inch)
pub const CM_PER_POINT: f32 = 0.0352778;

/// Convert points to centimeters
#[inline]
pub fn pt_to_cm(pt: f32) -> f32 {
    pt * CM_PER_POINT
}

/// Convert centimeters to points
#[inline]
pub fn cm_to_pt(cm: f32) -> f32 {
    cm / CM_PER_POINT
}

// =============================================================================
// File Naming
// =============================================================================

/// Conventional extension for container files
pub const CONTAINER_EXTENSION: &str = "myext";

/// Prefix for payloads written back to disk by [`crate::extract_payload`]
pub const EXTRACTED_PREFIX: &str = "extracted_";

/// `original_type` value of sources that can be opened for viewing
pub const PDF_TYPE: &str = "pdf";

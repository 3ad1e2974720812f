//! Shared constants for rendering, layout and printing

use crate::types::Dpi;

// =============================================================================
// Resolution
// =============================================================================

/// PDF points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Resolution used when no DPI is requested
pub const DEFAULT_DPI: u32 = 72;

/// Resolutions tried in order when rendering for print
pub const PRINT_DPI_LADDER: [Dpi; 3] = [Dpi::Fixed(600), Dpi::Fixed(300), Dpi::Default];

/// Upper bound on pixels in a single rasterized page (~450 MB of RGB).
/// An attempt that would exceed it fails and falls through to the next DPI.
pub const MAX_BITMAP_PIXELS: u64 = 150_000_000;

/// Pixel count of a page rendered at `dpi`
#[inline]
pub fn bitmap_pixels(width_pt: f32, height_pt: f32, dpi: u32) -> u64 {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let width = (width_pt * scale).round().max(1.0) as u64;
    let height = (height_pt * scale).round().max(1.0) as u64;
    width * height
}

// =============================================================================
// Display Layout
// =============================================================================

/// Largest on-screen size for portrait pages (pixels)
pub const PORTRAIT_MAX_WIDTH: u32 = 800;
pub const PORTRAIT_MAX_HEIGHT: u32 = 1000;

/// Largest on-screen size for landscape pages (pixels)
pub const LANDSCAPE_MAX_WIDTH: u32 = 1000;
pub const LANDSCAPE_MAX_HEIGHT: u32 = 800;

// =============================================================================
// Paper Classification
// =============================================================================

/// Absolute tolerance when matching page sizes against the catalog (cm)
pub const SIZE_TOLERANCE_CM: f32 = 0.1;

/// Slack added to the tolerance so that a difference of exactly 0.1 cm
/// still matches after f32 rounding
pub const SIZE_TOLERANCE_SLACK_CM: f32 = 1e-4;

// =============================================================================
// Watermark
// =============================================================================

pub const WATERMARK_TEXT: &str = "Confidential";

pub const WATERMARK_OPACITY: f32 = 0.2;

/// Counter-clockwise rotation of the watermark baseline (degrees)
pub const WATERMARK_ANGLE_DEGREES: f32 = 45.0;

/// Share of the sheet diagonal the watermark text spans
pub const WATERMARK_SPAN: f32 = 0.6;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Print Surface
// =============================================================================

/// Default sheet margin on every side (cm)
pub const DEFAULT_SHEET_MARGIN_CM: f32 = 0.5;

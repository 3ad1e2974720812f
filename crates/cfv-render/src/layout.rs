//! On-screen page layout
//!
//! Rendered bitmaps are shrunk (never enlarged) to fit an orientation
//! dependent ceiling, using one scale factor for both axes.

use cfv_container::Orientation;
use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::constants::{
    LANDSCAPE_MAX_HEIGHT, LANDSCAPE_MAX_WIDTH, PORTRAIT_MAX_HEIGHT, PORTRAIT_MAX_WIDTH,
};
use crate::paper::{PaperClass, describe_size};
use crate::types::RenderedPage;

/// Largest size a page may occupy, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxSize {
    pub width: u32,
    pub height: u32,
}

/// Display ceilings for each orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutBounds {
    pub portrait: MaxSize,
    pub landscape: MaxSize,
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self {
            portrait: MaxSize {
                width: PORTRAIT_MAX_WIDTH,
                height: PORTRAIT_MAX_HEIGHT,
            },
            landscape: MaxSize {
                width: LANDSCAPE_MAX_WIDTH,
                height: LANDSCAPE_MAX_HEIGHT,
            },
        }
    }
}

impl LayoutBounds {
    pub fn for_orientation(&self, orientation: Orientation) -> MaxSize {
        match orientation {
            Orientation::Portrait => self.portrait,
            Orientation::Landscape => self.landscape,
        }
    }
}

/// Scaled raster dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedSize {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

/// Fit `width` x `height` inside `bounds` without enlarging.
///
/// Both axes use the same factor, `min(max_w / w, max_h / h, 1)`, and the
/// results are floored. An extreme aspect ratio can floor one axis to zero.
pub fn fit_dimensions(width: u32, height: u32, bounds: MaxSize) -> FittedSize {
    if width == 0 || height == 0 {
        return FittedSize {
            width,
            height,
            scale: 1.0,
        };
    }

    let scale = (bounds.width as f64 / width as f64)
        .min(bounds.height as f64 / height as f64)
        .min(1.0);

    if scale >= 1.0 {
        return FittedSize {
            width,
            height,
            scale: 1.0,
        };
    }

    FittedSize {
        width: (width as f64 * scale).floor() as u32,
        height: (height as f64 * scale).floor() as u32,
        scale,
    }
}

/// Layout decision for one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub size: FittedSize,
    pub orientation: Orientation,
    /// Classification of the physical page size, not of the raster
    pub paper: PaperClass,
}

/// Fit a rendered page to the display bounds for its orientation
pub fn fit_to_bounds(page: &RenderedPage, bounds: &LayoutBounds) -> PageFit {
    let size = fit_dimensions(
        page.pixel_width(),
        page.pixel_height(),
        bounds.for_orientation(page.orientation),
    );
    log::debug!(
        "Page {}: {}x{} px ({}) -> {}x{} px",
        page.index + 1,
        page.pixel_width(),
        page.pixel_height(),
        page.orientation.name(),
        size.width,
        size.height
    );
    PageFit {
        size,
        orientation: page.orientation,
        paper: page.paper(),
    }
}

/// A page ready to be shown by a viewer
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    /// One-based page number in the source document
    pub page_number: usize,
    pub image: RgbImage,
    pub paper: PaperClass,
    /// e.g. `"Page 3"`
    pub title: String,
    /// e.g. `"Size: 21.00 cm x 29.70 cm (A4)"`
    pub size_label: String,
}

/// Fit a page to the display bounds and resample its bitmap accordingly
pub fn scale_for_display(page: &RenderedPage, bounds: &LayoutBounds) -> DisplayPage {
    let fit = fit_to_bounds(page, bounds);
    let image = if fit.size.scale < 1.0 {
        // A sliver page still gets a one pixel row or column
        imageops::resize(
            &page.image,
            fit.size.width.max(1),
            fit.size.height.max(1),
            FilterType::Lanczos3,
        )
    } else {
        page.image.clone()
    };

    DisplayPage {
        page_number: page.index + 1,
        image,
        paper: fit.paper,
        title: format!("Page {}", page.index + 1),
        size_label: describe_size(page.width_cm, page.height_cm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTRAIT: MaxSize = MaxSize {
        width: PORTRAIT_MAX_WIDTH,
        height: PORTRAIT_MAX_HEIGHT,
    };

    fn blank_page(width_px: u32, height_px: u32, size_pt: (f32, f32)) -> RenderedPage {
        RenderedPage::new(0, RgbImage::new(width_px, height_px), 72, size_pt)
    }

    #[test]
    fn test_small_raster_is_unchanged() {
        let fit = fit_dimensions(595, 842, PORTRAIT);
        assert_eq!((fit.width, fit.height), (595, 842));
        assert_eq!(fit.scale, 1.0);
    }

    #[test]
    fn test_large_raster_is_shrunk_within_bounds() {
        // A4 at 300 DPI
        let fit = fit_dimensions(2480, 3508, PORTRAIT);
        assert!(fit.width <= PORTRAIT.width);
        assert!(fit.height <= PORTRAIT.height);
        assert!(fit.height >= 999);
        assert_eq!(fit.width, 706);
    }

    #[test]
    fn test_aspect_ratio_uses_one_factor() {
        let fit = fit_dimensions(4000, 1000, PORTRAIT);
        assert_eq!(fit.scale, 0.2);
        assert_eq!((fit.width, fit.height), (800, 200));
    }

    #[test]
    fn test_shrink_property_over_a_grid() {
        for width in (100..5000).step_by(373) {
            for height in (100..5000).step_by(419) {
                let fit = fit_dimensions(width, height, PORTRAIT);
                assert!(fit.width <= width && fit.height <= height);
                if width <= PORTRAIT.width && height <= PORTRAIT.height {
                    assert_eq!((fit.width, fit.height), (width, height));
                } else {
                    assert!(fit.width <= PORTRAIT.width);
                    assert!(fit.height <= PORTRAIT.height);
                }
            }
        }
    }

    #[test]
    fn test_extreme_aspect_ratio_floors_to_zero() {
        let fit = fit_dimensions(10_000, 5, PORTRAIT);
        assert_eq!(fit.scale, 0.08);
        assert_eq!((fit.width, fit.height), (800, 0));
    }

    #[test]
    fn test_display_of_sliver_page_keeps_one_pixel() {
        let page = blank_page(10_000, 5, (7200.0, 3.6));
        let display = scale_for_display(&page, &LayoutBounds::default());
        assert_eq!(display.image.dimensions(), (1000, 1));
    }

    #[test]
    fn test_empty_raster() {
        let fit = fit_dimensions(0, 10, PORTRAIT);
        assert_eq!((fit.width, fit.height), (0, 10));
    }

    #[test]
    fn test_landscape_page_uses_landscape_bounds() {
        let page = blank_page(2000, 1000, (842.0, 595.0));
        let fit = fit_to_bounds(&page, &LayoutBounds::default());
        assert_eq!(fit.orientation, Orientation::Landscape);
        assert_eq!((fit.size.width, fit.size.height), (1000, 500));
    }

    #[test]
    fn test_fit_classifies_physical_size() {
        // Tiny raster of an A4 page: the label follows the page box
        let page = blank_page(21, 30, (595.28, 841.89));
        let fit = fit_to_bounds(&page, &LayoutBounds::default());
        assert_eq!(fit.paper.to_string(), "A4");
    }

    #[test]
    fn test_scale_for_display_resizes_bitmap() {
        let page = blank_page(320, 400, (595.28, 841.89));
        let bounds = LayoutBounds {
            portrait: MaxSize {
                width: 160,
                height: 200,
            },
            ..LayoutBounds::default()
        };
        let display = scale_for_display(&page, &bounds);
        assert_eq!(display.image.dimensions(), (160, 200));
        assert_eq!(display.title, "Page 1");
        assert_eq!(display.size_label, "Size: 21.00 cm x 29.70 cm (A4)");
    }
}

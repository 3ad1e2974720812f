//! Print pipeline
//!
//! Pages are re-rendered at print resolution, then each one is scaled to fit
//! the printable area of the output surface and centered on its own sheet.

mod pdf;

use std::ops::RangeInclusive;

use cfv_container::constants::cm_to_pt;

use crate::constants::{DEFAULT_SHEET_MARGIN_CM, POINTS_PER_INCH};
use crate::paper::find_by_label;
use crate::types::{PageFailure, RenderError, RenderedPage, Result};

pub use pdf::{print_pdf_bytes, write_print_pdf};

// =============================================================================
// Page Range
// =============================================================================

/// Zero-based, inclusive page range as requested by a caller.
///
/// `None` on a bound means "unspecified". Out-of-range bounds are clamped
/// to the document rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl PageRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        Self { from, to }
    }

    /// Build a range from print dialog values, where `-1` on both bounds
    /// means the whole document
    pub fn from_dialog(from: i64, to: i64) -> Self {
        if from == -1 && to == -1 {
            Self::all()
        } else {
            Self::new(Some(from), Some(to))
        }
    }

    /// Concrete page indices for a document with `page_count` pages.
    ///
    /// Returns `None` when nothing is left after clamping.
    pub fn resolve(&self, page_count: usize) -> Option<RangeInclusive<usize>> {
        if page_count == 0 {
            return None;
        }
        let last = page_count as i64 - 1;
        let from = self.from.unwrap_or(0).max(0);
        let to = self.to.unwrap_or(last).min(last);
        if from > to {
            return None;
        }
        Some(from as usize..=to as usize)
    }
}

// =============================================================================
// Output Surface
// =============================================================================

/// Margins around the printable area (cm)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceMargins {
    pub top_cm: f32,
    pub bottom_cm: f32,
    pub left_cm: f32,
    pub right_cm: f32,
}

impl Default for SurfaceMargins {
    fn default() -> Self {
        Self::uniform(DEFAULT_SHEET_MARGIN_CM)
    }
}

impl SurfaceMargins {
    pub fn uniform(margin_cm: f32) -> Self {
        Self {
            top_cm: margin_cm,
            bottom_cm: margin_cm,
            left_cm: margin_cm,
            right_cm: margin_cm,
        }
    }
}

/// Sheet the print job is laid out on
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrintSurface {
    pub width_cm: f32,
    pub height_cm: f32,
    pub margins: SurfaceMargins,
}

impl Default for PrintSurface {
    fn default() -> Self {
        Self::a4()
    }
}

impl PrintSurface {
    pub fn a4() -> Self {
        Self {
            width_cm: 21.0,
            height_cm: 29.7,
            margins: SurfaceMargins::default(),
        }
    }

    /// Portrait surface for a catalog paper label such as `"Letter"`
    pub fn from_paper_label(label: &str) -> Option<Self> {
        find_by_label(label).map(|entry| Self {
            width_cm: entry.width_cm,
            height_cm: entry.height_cm,
            margins: SurfaceMargins::default(),
        })
    }

    /// The same sheet turned sideways
    pub fn landscape(self) -> Self {
        let m = self.margins;
        Self {
            width_cm: self.height_cm,
            height_cm: self.width_cm,
            margins: SurfaceMargins {
                top_cm: m.left_cm,
                bottom_cm: m.right_cm,
                left_cm: m.bottom_cm,
                right_cm: m.top_cm,
            },
        }
    }

    pub fn width_pt(&self) -> f32 {
        cm_to_pt(self.width_cm)
    }

    pub fn height_pt(&self) -> f32 {
        cm_to_pt(self.height_cm)
    }

    /// Area inside the margins, in points from the bottom-left corner
    pub fn printable_area(&self) -> Rect {
        let m = self.margins;
        Rect::new(
            cm_to_pt(m.left_cm),
            cm_to_pt(m.bottom_cm),
            cm_to_pt(self.width_cm - m.left_cm - m.right_cm),
            cm_to_pt(self.height_cm - m.top_cm - m.bottom_cm),
        )
    }

    pub fn validate(&self) -> Result<()> {
        let m = self.margins;
        if [m.top_cm, m.bottom_cm, m.left_cm, m.right_cm]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(RenderError::Config(
                "print margins cannot be negative".to_string(),
            ));
        }
        let area = self.printable_area();
        if area.width <= 0.0 || area.height <= 0.0 {
            return Err(RenderError::Config(format!(
                "margins leave no printable area on a {:.2} x {:.2} cm sheet",
                self.width_cm, self.height_cm
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Rectangle in PDF points, origin at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Largest rectangle with the aspect ratio of `width` x `height` that
    /// fits inside `self`, centered
    pub fn fit_centered(&self, width: f32, height: f32) -> Rect {
        if width <= 0.0 || height <= 0.0 {
            return Rect::new(self.x + self.width / 2.0, self.y + self.height / 2.0, 0.0, 0.0);
        }
        let scale = (self.width / width).min(self.height / height);
        let w = width * scale;
        let h = height * scale;
        Rect::new(
            self.x + (self.width - w) / 2.0,
            self.y + (self.height - h) / 2.0,
            w,
            h,
        )
    }
}

/// One printed sheet holding one document page
#[derive(Debug, Clone)]
pub struct PrintSheet {
    pub page: RenderedPage,
    /// Where the page bitmap lands on the sheet
    pub placement: Rect,
}

/// Pages laid out on sheets, ready to be written or sent to a printer
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub surface: PrintSurface,
    pub sheets: Vec<PrintSheet>,
    /// Pages in the requested range that could not be rendered
    pub skipped: Vec<PageFailure>,
}

impl PrintJob {
    /// Lay out `pages` one per sheet on `surface`
    pub fn layout<I>(pages: I, surface: PrintSurface) -> Self
    where
        I: IntoIterator<Item = RenderedPage>,
    {
        let area = surface.printable_area();
        let sheets = pages
            .into_iter()
            .map(|page| {
                let (width_pt, height_pt) = natural_size_pt(&page);
                let placement = area.fit_centered(width_pt, height_pt);
                log::debug!(
                    "Sheet for page {}: {:.1}x{:.1} pt at ({:.1}, {:.1})",
                    page.index + 1,
                    placement.width,
                    placement.height,
                    placement.x,
                    placement.y
                );
                PrintSheet { page, placement }
            })
            .collect();

        Self {
            surface,
            sheets,
            skipped: Vec::new(),
        }
    }

    pub fn with_skipped(mut self, skipped: Vec<PageFailure>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Zero-based source indices of the printed pages, in sheet order
    pub fn page_indices(&self) -> Vec<usize> {
        self.sheets.iter().map(|s| s.page.index).collect()
    }
}

/// Size of a rendered bitmap in points at the DPI it was produced at
fn natural_size_pt(page: &RenderedPage) -> (f32, f32) {
    let dpi = page.dpi.max(1) as f32;
    (
        page.pixel_width() as f32 * POINTS_PER_INCH / dpi,
        page.pixel_height() as f32 * POINTS_PER_INCH / dpi,
    )
}

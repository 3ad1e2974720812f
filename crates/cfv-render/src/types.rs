use cfv_container::Orientation;
use cfv_container::constants::pt_to_cm;
use image::RgbImage;
use std::fmt;
use thiserror::Error;

use crate::paper::{PaperClass, lookup};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot open document: {0}")]
    DocumentOpen(String),
    #[error("Failed to render page {page}: {reason}")]
    PageRender { page: usize, reason: String },
    #[error("PDF backend unavailable: {0}")]
    Backend(String),
    #[error("File type '{0}' is not supported for viewing")]
    UnsupportedType(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Nothing to print")]
    NothingToPrint,
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Resolution requested for one rasterization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dpi {
    /// The rasterizer's native resolution (one pixel per point)
    Default,
    Fixed(u32),
}

impl Dpi {
    pub fn resolve(self, default_dpi: u32) -> u32 {
        match self {
            Dpi::Default => default_dpi,
            Dpi::Fixed(dpi) => dpi,
        }
    }
}

impl From<Option<u32>> for Dpi {
    fn from(dpi: Option<u32>) -> Self {
        dpi.map_or(Dpi::Default, Dpi::Fixed)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dpi::Default => f.write_str("default"),
            Dpi::Fixed(dpi) => write!(f, "{}", dpi),
        }
    }
}

/// One rasterized page.
///
/// The physical size comes from the page box and does not depend on the DPI
/// the bitmap was produced at. Orientation is derived from the physical size.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Zero-based index of the page in the source document
    pub index: usize,
    pub image: RgbImage,
    /// Resolution the bitmap was actually produced at
    pub dpi: u32,
    pub width_cm: f32,
    pub height_cm: f32,
    pub orientation: Orientation,
}

impl RenderedPage {
    pub fn new(index: usize, image: RgbImage, dpi: u32, page_size_pt: (f32, f32)) -> Self {
        let width_cm = pt_to_cm(page_size_pt.0);
        let height_cm = pt_to_cm(page_size_pt.1);
        Self {
            index,
            image,
            dpi,
            width_cm,
            height_cm,
            orientation: Orientation::from_dimensions(width_cm, height_cm),
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    /// Catalog match for the physical page size
    pub fn paper(&self) -> PaperClass {
        lookup(self.width_cm, self.height_cm)
    }
}

/// A page dropped from a render pass after every resolution attempt failed
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    pub index: usize,
    pub reason: String,
}

//! Rasterization backends
//!
//! The renderer only needs three things from a PDF engine: how many pages a
//! document has, how big each page is, and a bitmap of a page at a given
//! resolution. [`DocumentBackend`] opens documents, [`PageSource`] answers
//! those questions for one open document.

use std::path::Path;

use image::RgbImage;

use crate::types::Result;

#[cfg(all(feature = "pdfium", not(target_arch = "wasm32")))]
mod pdfium;

#[cfg(all(feature = "pdfium", not(target_arch = "wasm32")))]
pub use pdfium::{PdfiumBackend, init_pdfium};

/// An opened document
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Page box of page `index` in points, after rotation
    fn page_size_pt(&self, index: usize) -> Result<(f32, f32)>;

    /// Rasterize page `index` at `dpi` pixels per inch
    fn rasterize(&self, index: usize, dpi: u32) -> Result<RgbImage>;
}

/// Something that can open PDF files for rasterization
pub trait DocumentBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>>;
}

/// Pixel size of a `width_pt` x `height_pt` page rendered at `dpi`
pub fn raster_size(width_pt: f32, height_pt: f32, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / crate::constants::POINTS_PER_INCH;
    (
        (width_pt * scale).round().max(1.0) as u32,
        (height_pt * scale).round().max(1.0) as u32,
    )
}

/// Drop the alpha channel of a tightly packed RGBA buffer
#[cfg_attr(not(feature = "pdfium"), allow(dead_code))]
pub(crate) fn rgba_to_rgb(width: u32, height: u32, rgba: &[u8]) -> Option<RgbImage> {
    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    RgbImage::from_raw(width, height, rgb)
}

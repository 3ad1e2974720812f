use std::path::{Path, PathBuf};

use image::RgbImage;
use pdfium_render::prelude::*;

use super::{DocumentBackend, PageSource, raster_size, rgba_to_rgb};
use crate::types::{RenderError, Result};

/// Environment variable naming a directory that holds the pdfium library
pub const PDFIUM_PATH_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// Initialize Pdfium.
///
/// Tries the directory named by `PDFIUM_DYNAMIC_LIB_PATH`, then the vendored
/// library under `vendor/pdfium/lib`, then the system library.
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let candidates = std::env::var_os(PDFIUM_PATH_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(std::env::current_dir().ok().map(|mut p| {
            p.push("vendor/pdfium/lib");
            p
        }))
        .filter(|p| p.exists());

    for dir in candidates {
        match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)) {
            Ok(binding) => {
                log::debug!("Bound pdfium from {}", dir.display());
                return Ok(Pdfium::new(binding));
            }
            Err(e) => log::debug!("No usable pdfium in {}: {}", dir.display(), e),
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Rasterizer backed by the pdfium shared library
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    pub fn new() -> Result<Self> {
        let pdfium = init_pdfium().map_err(|e| RenderError::Backend(e.to_string()))?;
        Ok(Self { pdfium })
    }
}

impl DocumentBackend for PdfiumBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::DocumentOpen(format!("{}: {}", path.display(), e)))?;
        Ok(Box::new(PdfiumSource { document }))
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| RenderError::PageRender {
                page: index,
                reason: e.to_string(),
            })
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size_pt(&self, index: usize) -> Result<(f32, f32)> {
        let page = self.page(index)?;
        Ok((page.width().value, page.height().value))
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<RgbImage> {
        let page = self.page(index)?;
        let (width, height) = raster_size(page.width().value, page.height().value, dpi);

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_maximum_height(height as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RenderError::PageRender {
                page: index,
                reason: e.to_string(),
            })?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        rgba_to_rgb(width, height, &bitmap.as_rgba_bytes()).ok_or_else(|| {
            RenderError::PageRender {
                page: index,
                reason: format!("bitmap buffer does not match {}x{}", width, height),
            }
        })
    }
}

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cfv_render::{DocumentBackend, PageSource, RenderError, Result, raster_size};
use image::{Rgb, RgbImage};
use lopdf::Document;

#[path = "../../../cfv-container/tests/common/mod.rs"]
mod pdf;

pub use pdf::*;

pub fn write_test_pdf(dir: &Path, name: &str, page_sizes: &[(f32, f32)]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, create_test_pdf(page_sizes)).unwrap();
    path
}

/// Backend that reads page boxes with lopdf and produces blank bitmaps.
///
/// Pages in `failing_pages` fail at every resolution; resolutions in
/// `failing_dpis` fail for every page. Each rasterization attempt is logged.
#[derive(Default)]
pub struct TestBackend {
    pub failing_pages: HashSet<usize>,
    pub failing_dpis: HashSet<u32>,
    pub attempts: Mutex<Vec<(usize, u32)>>,
}

impl TestBackend {
    pub fn failing_pages(pages: &[usize]) -> Self {
        Self {
            failing_pages: pages.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn failing_dpis(dpis: &[u32]) -> Self {
        Self {
            failing_dpis: dpis.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> Vec<(usize, u32)> {
        self.attempts.lock().unwrap().clone()
    }
}

impl DocumentBackend for TestBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::DocumentOpen(format!("{}: {}", path.display(), e)))?;
        let doc = Document::load_mem(&bytes)
            .map_err(|e| RenderError::DocumentOpen(format!("{}: {}", path.display(), e)))?;

        let sizes = doc
            .get_pages()
            .values()
            .map(|id| {
                doc.get_dictionary(*id)
                    .ok()
                    .and_then(|page| page.get(b"MediaBox").ok())
                    .and_then(|mb| mb.as_array().ok())
                    .and_then(|mb| {
                        let w = mb.get(2)?.as_float().ok()?;
                        let h = mb.get(3)?.as_float().ok()?;
                        Some((w, h))
                    })
                    .unwrap_or(LETTER_PT)
            })
            .collect();

        Ok(Box::new(TestSource {
            backend: self,
            sizes,
        }))
    }
}

struct TestSource<'a> {
    backend: &'a TestBackend,
    sizes: Vec<(f32, f32)>,
}

impl PageSource for TestSource<'_> {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn page_size_pt(&self, index: usize) -> Result<(f32, f32)> {
        self.sizes.get(index).copied().ok_or(RenderError::PageRender {
            page: index,
            reason: "no such page".to_string(),
        })
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<RgbImage> {
        self.backend.attempts.lock().unwrap().push((index, dpi));
        if self.backend.failing_pages.contains(&index) || self.backend.failing_dpis.contains(&dpi)
        {
            return Err(RenderError::PageRender {
                page: index,
                reason: format!("injected failure at {} DPI", dpi),
            });
        }
        let (width, height) = self.page_size_pt(index)?;
        let (w, h) = raster_size(width, height, dpi);
        Ok(RgbImage::from_pixel(w, h, Rgb([255, 255, 255])))
    }
}

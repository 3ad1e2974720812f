//! Page rendering with per-page DPI fallback
//!
//! A render call opens the document once and yields pages lazily. Each page
//! is tried at every resolution of a DPI ladder in turn; a page that fails at
//! all of them is logged, recorded and skipped, and rendering moves on. Only
//! failing to open the document aborts the call.

use std::ops::Range;
use std::path::Path;

use cfv_container::ContainerMetadata;

use crate::backend::{DocumentBackend, PageSource};
use crate::constants::bitmap_pixels;
use crate::options::RenderOptions;
use crate::print::{PageRange, PrintJob};
use crate::types::{Dpi, PageFailure, RenderError, RenderedPage, Result};

/// Fail with [`RenderError::UnsupportedType`] unless the container holds a PDF
pub fn ensure_viewable(metadata: &ContainerMetadata) -> Result<()> {
    if metadata.is_pdf() {
        Ok(())
    } else {
        Err(RenderError::UnsupportedType(metadata.original_type.clone()))
    }
}

/// Renders documents through a [`DocumentBackend`]
pub struct PageRenderer<'b> {
    backend: &'b dyn DocumentBackend,
    options: RenderOptions,
}

impl<'b> PageRenderer<'b> {
    pub fn new(backend: &'b dyn DocumentBackend, options: RenderOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render every page at `dpi`, or at the default resolution when `None`.
    ///
    /// Calling again re-opens the document, so a document can be re-rendered
    /// at a different resolution.
    pub fn render_document(&self, path: &Path, dpi: Option<u32>) -> Result<RenderedPages<'b>> {
        self.render_range(path, PageRange::all(), &[Dpi::from(dpi)])
    }

    /// Render the pages in `range`, trying each resolution in `ladder` in order
    pub fn render_range(
        &self,
        path: &Path,
        range: PageRange,
        ladder: &[Dpi],
    ) -> Result<RenderedPages<'b>> {
        let source = self.open(path)?;
        let page_count = source.page_count();
        let indices = match range.resolve(page_count) {
            Some(r) => *r.start()..*r.end() + 1,
            None => 0..0,
        };
        log::debug!(
            "Rendering pages {:?} of {} from {}",
            indices,
            page_count,
            path.display()
        );

        let ladder = if ladder.is_empty() {
            vec![Dpi::Default]
        } else {
            ladder.to_vec()
        };

        Ok(RenderedPages {
            source,
            page_count,
            indices,
            ladder,
            default_dpi: self.options.default_dpi,
            max_bitmap_pixels: self.options.max_bitmap_pixels,
            skipped: Vec::new(),
        })
    }

    /// Number of pages in the document at `path`
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.open(path)?.page_count())
    }

    /// Re-render `range` for print using the print DPI ladder.
    ///
    /// An unspecified range means the whole document; out-of-range bounds
    /// are clamped.
    pub fn prepare_print_pages(&self, path: &Path, range: PageRange) -> Result<RenderedPages<'b>> {
        self.render_range(path, range, &self.options.print_dpi_ladder)
    }

    /// Render `range` for print and lay it out on the configured surface
    pub fn print_job(&self, path: &Path, range: PageRange) -> Result<PrintJob> {
        let mut pages = self.prepare_print_pages(path, range)?;
        let rendered: Vec<RenderedPage> = pages.by_ref().collect();
        let skipped = pages.into_skipped();
        Ok(PrintJob::layout(rendered, self.options.print_surface.clone()).with_skipped(skipped))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PageSource + 'b>> {
        self.backend.open(path).map_err(|e| match e {
            RenderError::DocumentOpen(_) | RenderError::Backend(_) => e,
            other => RenderError::DocumentOpen(format!("{}: {}", path.display(), other)),
        })
    }
}

/// Lazily rendered pages of one document
pub struct RenderedPages<'b> {
    source: Box<dyn PageSource + 'b>,
    page_count: usize,
    indices: Range<usize>,
    ladder: Vec<Dpi>,
    default_dpi: u32,
    max_bitmap_pixels: u64,
    skipped: Vec<PageFailure>,
}

impl RenderedPages<'_> {
    /// Page count reported by the document
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Pages dropped so far
    pub fn skipped(&self) -> &[PageFailure] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<PageFailure> {
        self.skipped
    }

    fn render_page(&self, index: usize) -> std::result::Result<RenderedPage, String> {
        let (width_pt, height_pt) = self
            .source
            .page_size_pt(index)
            .map_err(|e| e.to_string())?;

        let mut last_error = String::from("no resolution attempted");
        for dpi in &self.ladder {
            let resolved = dpi.resolve(self.default_dpi);
            let pixels = bitmap_pixels(width_pt, height_pt, resolved);

            let attempt = if pixels > self.max_bitmap_pixels {
                Err(RenderError::PageRender {
                    page: index,
                    reason: format!(
                        "{} pixel bitmap exceeds the limit of {}",
                        pixels, self.max_bitmap_pixels
                    ),
                })
            } else {
                self.source.rasterize(index, resolved)
            };

            match attempt {
                Ok(image) => {
                    log::info!("Rendered page {} at {} DPI", index + 1, resolved);
                    return Ok(RenderedPage::new(
                        index,
                        image,
                        resolved,
                        (width_pt, height_pt),
                    ));
                }
                Err(e) => {
                    log::warn!("Page {}: rendering at {} DPI failed: {}", index + 1, dpi, e);
                    last_error = e.to_string();
                }
            }
        }
        Err(last_error)
    }
}

impl Iterator for RenderedPages<'_> {
    type Item = RenderedPage;

    fn next(&mut self) -> Option<RenderedPage> {
        while let Some(index) = self.indices.next() {
            match self.render_page(index) {
                Ok(page) => return Some(page),
                Err(reason) => {
                    log::error!("Skipping page {}: {}", index + 1, reason);
                    self.skipped.push(PageFailure { index, reason });
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.indices.len()))
    }
}

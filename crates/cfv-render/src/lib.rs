//! Rendering core for the custom file viewer: rasterization with DPI
//! fallback, on-screen layout, paper-size classification and printing.

pub mod backend;
pub mod constants;
mod layout;
mod options;
pub mod paper;
pub mod print;
mod renderer;
mod types;
mod watermark;

pub use backend::{DocumentBackend, PageSource, raster_size};
#[cfg(all(feature = "pdfium", not(target_arch = "wasm32")))]
pub use backend::{PdfiumBackend, init_pdfium};
pub use layout::*;
pub use options::RenderOptions;
pub use paper::{PAPER_SIZES, PaperClass, PaperSizeEntry, classify, describe_size};
pub use print::{PageRange, PrintJob, PrintSheet, PrintSurface, SurfaceMargins, write_print_pdf};
pub use renderer::{PageRenderer, RenderedPages, ensure_viewable};
pub use types::*;
pub use watermark::Watermark;

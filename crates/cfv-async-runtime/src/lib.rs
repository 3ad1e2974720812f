//! Message-passing front for the viewer core.
//!
//! A UI sends [`ViewerCommand`]s to [`worker_task`] and receives
//! [`ViewerUpdate`]s back. Blocking core calls (decoding, rasterizing,
//! writing print output) run on tokio's blocking pool.

use std::fmt;
use std::path::PathBuf;

mod config;
mod handlers;
mod session;
mod types;
mod worker;

pub use config::{ViewerConfig, ViewerFeatures};
pub use session::{Session, ViewerState};
pub use types::*;
pub use worker::{BackendFactory, worker_task};

#[cfg(feature = "pdfium")]
pub use worker::pdfium_backend_factory;

// Re-export types carried in commands and updates
pub use cfv_container::ContainerMetadata;
pub use cfv_render::{DisplayPage, PageFailure, PageRange, RenderOptions, Watermark};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum ViewerCommand {
    /// Decode a container, extract its payload and open it for viewing
    Open {
        container_path: PathBuf,
    },
    /// Render every page of an open document for display
    RenderPages {
        doc_id: DocumentId,
        dpi: Option<u32>,
    },
    /// Re-render a page range at print resolution and write it as a PDF
    Print {
        doc_id: DocumentId,
        range: PageRange,
        output_path: PathBuf,
    },
    Close {
        doc_id: DocumentId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum ViewerUpdate {
    Opened {
        doc_id: DocumentId,
        metadata: ContainerMetadata,
        page_count: usize,
    },
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    PagesRendered {
        doc_id: DocumentId,
        pages: Vec<DisplayPage>,
        /// Pages that could not be rendered at any resolution
        skipped: Vec<PageFailure>,
        /// Overlay to paint on every page, when enabled
        watermark: Option<Watermark>,
    },
    Printed {
        doc_id: DocumentId,
        path: PathBuf,
        sheet_count: usize,
        skipped: Vec<PageFailure>,
    },
    Closed {
        doc_id: DocumentId,
    },
    Error {
        message: String,
    },
}

/// Handle to an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

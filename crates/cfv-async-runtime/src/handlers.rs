use std::path::PathBuf;

use cfv_render::{PageRange, PageRenderer, ensure_viewable, scale_for_display, write_print_pdf};
use tokio::sync::mpsc;

use crate::config::ViewerConfig;
use crate::session::{Session, ViewerState};
use crate::types::{Result, ViewerError};
use crate::worker::BackendFactory;
use crate::{DocumentId, ViewerUpdate};

pub async fn handle_open(
    container_path: PathBuf,
    config: &ViewerConfig,
    backend: &BackendFactory,
    state: &mut ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    match open_document(container_path.clone(), config, backend.clone()).await {
        Ok(session) => {
            let doc_id = state.next_id();
            let metadata = session.metadata.clone();
            let page_count = session.page_count;
            state.add_document(doc_id, session);
            log::info!(
                "Opened {} as {} ({} pages, {} open)",
                container_path.display(),
                doc_id,
                page_count,
                state.len()
            );

            if !config.features.tabs {
                for previous in state.open_documents() {
                    if previous != doc_id {
                        handle_close(previous, state, update_tx).await;
                    }
                }
            }

            let _ = update_tx.send(ViewerUpdate::Opened {
                doc_id,
                metadata,
                page_count,
            });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: format!("Failed to open {}: {}", container_path.display(), e),
            });
        }
    }
}

async fn open_document(
    container_path: PathBuf,
    config: &ViewerConfig,
    backend: BackendFactory,
) -> Result<Session> {
    let scratch_dir = config.scratch_dir.clone();
    let options = config.render.clone();

    tokio::task::spawn_blocking(move || {
        let container = cfv_container::decode(&container_path)?;
        ensure_viewable(&container.metadata)?;

        std::fs::create_dir_all(&scratch_dir)?;
        // Removed on drop if anything below fails
        let scratch = tempfile::Builder::new()
            .prefix("session-")
            .tempdir_in(&scratch_dir)?;
        let extracted_path = cfv_container::extract_payload(&container, scratch.path())?;

        let backend = backend()?;
        let renderer = PageRenderer::new(backend.as_ref(), options);
        let page_count = renderer.page_count(&extracted_path)?;

        Ok::<_, ViewerError>(Session::new(
            container_path,
            scratch,
            extracted_path,
            container.metadata,
            page_count,
        ))
    })
    .await?
}

pub async fn handle_render_pages(
    doc_id: DocumentId,
    dpi: Option<u32>,
    config: &ViewerConfig,
    backend: &BackendFactory,
    state: &ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    let Some(session) = state.get_document(&doc_id) else {
        let _ = update_tx.send(ViewerUpdate::Error {
            message: ViewerError::UnknownDocument(doc_id).to_string(),
        });
        return;
    };

    let path = session.extracted_path.clone();
    let options = config.render.clone();
    let factory = backend.clone();
    let progress_tx = update_tx.clone();

    let result = tokio::task::spawn_blocking(move || {
        let backend = factory()?;
        let renderer = PageRenderer::new(backend.as_ref(), options);
        let mut pages = renderer.render_document(&path, dpi)?;
        let total = pages.page_count();

        let mut display = Vec::with_capacity(total);
        for page in pages.by_ref() {
            let _ = progress_tx.send(ViewerUpdate::Progress {
                operation: "Rendering pages".to_string(),
                current: page.index + 1,
                total,
            });
            display.push(scale_for_display(
                &page,
                &renderer.options().display_bounds,
            ));
        }
        Ok::<_, ViewerError>((display, pages.into_skipped()))
    })
    .await;

    match result.map_err(ViewerError::from).and_then(|r| r) {
        Ok((pages, skipped)) => {
            if !skipped.is_empty() {
                log::warn!(
                    "Document {}: {} page(s) could not be rendered",
                    doc_id,
                    skipped.len()
                );
            }
            let _ = update_tx.send(ViewerUpdate::PagesRendered {
                doc_id,
                pages,
                skipped,
                watermark: config.active_watermark().cloned(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: format!("Failed to render document {}: {}", doc_id, e),
            });
        }
    }
}

pub async fn handle_print(
    doc_id: DocumentId,
    range: PageRange,
    output_path: PathBuf,
    config: &ViewerConfig,
    backend: &BackendFactory,
    state: &ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    let result = match state.get_document(&doc_id) {
        _ if !config.features.print => Err(ViewerError::FeatureDisabled("Printing")),
        None => Err(ViewerError::UnknownDocument(doc_id)),
        Some(session) => {
            print_document(
                session.extracted_path.clone(),
                range,
                output_path.clone(),
                config,
                backend.clone(),
            )
            .await
        }
    };

    match result {
        Ok((sheet_count, skipped)) => {
            let _ = update_tx.send(ViewerUpdate::Printed {
                doc_id,
                path: output_path,
                sheet_count,
                skipped,
            });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: format!("Failed to print document {}: {}", doc_id, e),
            });
        }
    }
}

async fn print_document(
    path: PathBuf,
    range: PageRange,
    output_path: PathBuf,
    config: &ViewerConfig,
    backend: BackendFactory,
) -> Result<(usize, Vec<cfv_render::PageFailure>)> {
    let options = config.render.clone();
    let watermark = config.active_watermark().cloned();

    tokio::task::spawn_blocking(move || {
        let backend = backend()?;
        let renderer = PageRenderer::new(backend.as_ref(), options);
        let job = renderer.print_job(&path, range)?;
        write_print_pdf(&job, watermark.as_ref(), &output_path)?;
        Ok::<_, ViewerError>((job.sheet_count(), job.skipped))
    })
    .await?
}

pub async fn handle_close(
    doc_id: DocumentId,
    state: &mut ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    if let Some(session) = state.remove_document(doc_id) {
        close_session(session).await;
    }
    let _ = update_tx.send(ViewerUpdate::Closed { doc_id });
}

/// Remove a closed session's scratch directory off the async thread
pub async fn close_session(session: Session) {
    if let Err(e) = tokio::task::spawn_blocking(move || session.close()).await {
        log::warn!("Session cleanup task failed: {}", e);
    }
}

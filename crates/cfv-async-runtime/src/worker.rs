use std::sync::Arc;

use cfv_render::DocumentBackend;
use tokio::sync::mpsc;

use crate::config::ViewerConfig;
use crate::handlers;
use crate::session::ViewerState;
use crate::{ViewerCommand, ViewerUpdate};

/// Creates a rasterization backend on the blocking thread that uses it
pub type BackendFactory =
    Arc<dyn Fn() -> cfv_render::Result<Box<dyn DocumentBackend>> + Send + Sync>;

/// Backend factory binding the pdfium shared library
#[cfg(feature = "pdfium")]
pub fn pdfium_backend_factory() -> BackendFactory {
    Arc::new(|| {
        let backend = cfv_render::PdfiumBackend::new()?;
        Ok(Box::new(backend) as Box<dyn DocumentBackend>)
    })
}

struct WorkerContext {
    config: ViewerConfig,
    backend: BackendFactory,
    state: ViewerState,
}

/// Async worker task that processes viewer commands and sends updates.
///
/// Runs until the command channel closes, then removes any payloads it
/// extracted.
pub async fn worker_task(
    config: ViewerConfig,
    backend: BackendFactory,
    mut command_rx: mpsc::UnboundedReceiver<ViewerCommand>,
    update_tx: mpsc::UnboundedSender<ViewerUpdate>,
) {
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: format!("Invalid viewer configuration, using defaults: {}", e),
            });
            ViewerConfig::default()
        }
    };

    let mut ctx = WorkerContext {
        config,
        backend,
        state: ViewerState::new(),
    };

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut ctx, &mut command_rx, &update_tx).await;
    }

    for doc_id in ctx.state.open_documents() {
        if let Some(session) = ctx.state.remove_document(doc_id) {
            handlers::close_session(session).await;
        }
    }
}

async fn process_command(
    cmd: ViewerCommand,
    ctx: &mut WorkerContext,
    command_rx: &mut mpsc::UnboundedReceiver<ViewerCommand>,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    match cmd {
        ViewerCommand::Open { container_path } => {
            handlers::handle_open(
                container_path,
                &ctx.config,
                &ctx.backend,
                &mut ctx.state,
                update_tx,
            )
            .await;
        }
        ViewerCommand::RenderPages { doc_id, mut dpi } => {
            // Collapse queued renders of the same document into the newest one
            let was_open = ctx.state.get_document(&doc_id).is_some();
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    ViewerCommand::RenderPages {
                        doc_id: next_id,
                        dpi: next_dpi,
                    } if next_id == doc_id => {
                        log::debug!("Discarding queued render of {}, using newer request", doc_id);
                        dpi = next_dpi;
                    }
                    other => {
                        // Can't put it back, so handle it before the render
                        Box::pin(process_command(other, ctx, command_rx, update_tx)).await;
                    }
                }
            }

            // A queued Close, or an Open in single-document mode, may have
            // closed the target meanwhile
            if was_open && ctx.state.get_document(&doc_id).is_none() {
                log::debug!("Dropping render of {}, document was closed", doc_id);
                return;
            }

            handlers::handle_render_pages(
                doc_id,
                dpi,
                &ctx.config,
                &ctx.backend,
                &ctx.state,
                update_tx,
            )
            .await;
        }
        ViewerCommand::Print {
            doc_id,
            range,
            output_path,
        } => {
            handlers::handle_print(
                doc_id,
                range,
                output_path,
                &ctx.config,
                &ctx.backend,
                &ctx.state,
                update_tx,
            )
            .await;
        }
        ViewerCommand::Close { doc_id } => {
            handlers::handle_close(doc_id, &mut ctx.state, update_tx).await;
        }
    }
}

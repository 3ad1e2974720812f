//! Drives the viewer worker for one-shot CLI commands

use anyhow::{Result, bail};
use cfv_async_runtime::{ViewerCommand, ViewerConfig, ViewerUpdate, pdfium_backend_factory, worker_task};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Viewer {
    command_tx: mpsc::UnboundedSender<ViewerCommand>,
    update_rx: mpsc::UnboundedReceiver<ViewerUpdate>,
    worker: JoinHandle<()>,
}

impl Viewer {
    pub fn start(config: ViewerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(worker_task(
            config,
            pdfium_backend_factory(),
            command_rx,
            update_tx,
        ));
        Self {
            command_tx,
            update_rx,
            worker,
        }
    }

    /// Send `cmd` and wait for its result, logging progress on the way
    pub async fn request(&mut self, cmd: ViewerCommand) -> Result<ViewerUpdate> {
        self.command_tx.send(cmd)?;
        while let Some(update) = self.update_rx.recv().await {
            match update {
                ViewerUpdate::Progress {
                    operation,
                    current,
                    total,
                } => log::info!("{}: {}/{}", operation, current, total),
                ViewerUpdate::Error { message } => bail!(message),
                other => return Ok(other),
            }
        }
        bail!("viewer worker stopped unexpectedly")
    }

    /// Close the command channel and wait for the worker to clean up
    pub async fn shutdown(self) -> Result<()> {
        drop(self.command_tx);
        self.worker.await?;
        Ok(())
    }
}

use cfv_container::ContainerError;
use cfv_render::RenderError;
use thiserror::Error;

use crate::DocumentId;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("No open document {0}")]
    UnknownDocument(DocumentId),
    #[error("{0} is disabled in this viewer")]
    FeatureDisabled(&'static str),
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::PDF_TYPE;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Cannot read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write container {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed container: {0}")]
    Malformed(String),
    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),
    #[error("Cannot extract payload to {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;

/// Page orientation, derived from physical page dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Height >= width
    #[default]
    Portrait,
    /// Width > height
    Landscape,
}

impl Orientation {
    /// Landscape only when strictly wider than tall; square pages are portrait.
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Descriptive metadata stored alongside the payload.
///
/// `original_type` and `file_name` are required; the remaining keys are only
/// written for PDF sources. Unknown keys found in a container are kept in
/// `extra` so a decode/encode cycle does not drop them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerMetadata {
    /// Source extension, lowercase, without the dot
    pub original_type: String,
    /// Base name of the source file
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// First-page height, formatted as `"<n.nn>cm"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// First-page width, formatted as `"<n.nn>cm"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ContainerMetadata {
    pub fn new(original_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            original_type: original_type.into(),
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// Whether the payload can be handed to the page renderer
    pub fn is_pdf(&self) -> bool {
        self.original_type == PDF_TYPE
    }

    /// Parse the stored `width`/`height` strings back to centimeters
    pub fn page_size_cm(&self) -> Option<(f32, f32)> {
        let width = parse_cm(self.width.as_deref()?)?;
        let height = parse_cm(self.height.as_deref()?)?;
        Some((width, height))
    }
}

/// Format a length for the `width`/`height` metadata keys
pub fn format_cm(value: f32) -> String {
    format!("{:.2}cm", value)
}

fn parse_cm(value: &str) -> Option<f32> {
    value.trim().strip_suffix("cm")?.trim().parse().ok()
}

/// A decoded container: metadata plus the original file bytes
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub metadata: ContainerMetadata,
    pub payload: Vec<u8>,
}

/// On-disk shape; `content` is the base64 text of the payload
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ContainerDocument {
    pub metadata: ContainerMetadata,
    pub content: String,
}

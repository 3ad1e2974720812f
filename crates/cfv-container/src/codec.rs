//! Encoding a source file into a container and decoding it back

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};

use crate::constants::{EXTRACTED_PREFIX, PDF_TYPE, pt_to_cm};
use crate::pdf_info::read_pdf_info;
use crate::types::*;

impl Container {
    /// Read a source file and build a container around its bytes.
    ///
    /// For PDF sources the first-page size, orientation, author and creation
    /// date are recorded as well. A PDF that cannot be parsed is still
    /// wrapped; only the PDF-specific keys are left out.
    pub fn from_source(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let payload = std::fs::read(source).map_err(|e| ContainerError::SourceRead {
            path: source.to_owned(),
            source: e,
        })?;

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut metadata = ContainerMetadata::new(original_type_of(source), file_name);

        if metadata.original_type == PDF_TYPE {
            describe_pdf(&mut metadata, &payload);
        }

        Ok(Self { metadata, payload })
    }

    /// Serialize to the on-disk JSON text
    pub fn to_json(&self) -> Result<String> {
        let document = ContainerDocument {
            metadata: self.metadata.clone(),
            content: STANDARD.encode(&self.payload),
        };
        Ok(serde_json::to_string(&document)?)
    }

    /// Write the container to `dest`, replacing any existing file
    pub fn write_to(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        let json = self.to_json()?;
        std::fs::write(dest, json).map_err(|e| ContainerError::Encode {
            path: dest.to_owned(),
            source: e,
        })
    }
}

/// Wrap `source` into a container file at `dest`
pub fn encode(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<ContainerMetadata> {
    let container = Container::from_source(source)?;
    container.write_to(dest.as_ref())?;
    log::info!(
        "Encoded {} ({} bytes) into {}",
        container.metadata.file_name,
        container.payload.len(),
        dest.as_ref().display()
    );
    Ok(container.metadata)
}

/// Read and decode a container file
pub fn decode(container_path: impl AsRef<Path>) -> Result<Container> {
    let path = container_path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            ContainerError::Malformed(format!("{} is not UTF-8 text", path.display()))
        }
        _ => ContainerError::SourceRead {
            path: path.to_owned(),
            source: e,
        },
    })?;
    decode_str(&text)
}

/// Decode container JSON already held in memory.
///
/// A document that ends early (for example a write interrupted mid-way) is
/// reported as a corrupt payload; any other structural problem, including a
/// missing required key, is malformed.
pub fn decode_str(text: &str) -> Result<Container> {
    let document: ContainerDocument = serde_json::from_str(text).map_err(|e| {
        if e.is_eof() {
            ContainerError::CorruptPayload(format!("container is truncated: {}", e))
        } else {
            ContainerError::Malformed(e.to_string())
        }
    })?;

    let payload = STANDARD
        .decode(document.content.trim())
        .map_err(|e| ContainerError::CorruptPayload(e.to_string()))?;

    Ok(Container {
        metadata: document.metadata,
        payload,
    })
}

/// Write the payload to `<scratch_dir>/extracted_<file_name>` and return that path.
///
/// Only the final component of `file_name` is used, so a crafted name cannot
/// escape `scratch_dir`.
pub fn extract_payload(container: &Container, scratch_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let scratch_dir = scratch_dir.as_ref();
    std::fs::create_dir_all(scratch_dir).map_err(|e| ContainerError::Extract {
        path: scratch_dir.to_owned(),
        source: e,
    })?;

    let base_name = Path::new(&container.metadata.file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payload".to_string());
    let output = scratch_dir.join(format!("{}{}", EXTRACTED_PREFIX, base_name));

    std::fs::write(&output, &container.payload).map_err(|e| ContainerError::Extract {
        path: output.clone(),
        source: e,
    })?;

    log::debug!("Extracted payload to {}", output.display());
    Ok(output)
}

/// Lowercased last extension segment of `path`, empty when there is none
pub fn original_type_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn describe_pdf(metadata: &mut ContainerMetadata, payload: &[u8]) {
    let info = match read_pdf_info(payload) {
        Ok(info) => info,
        Err(e) => {
            log::warn!(
                "Could not read PDF details from {}: {}",
                metadata.file_name,
                e
            );
            return;
        }
    };
    log::debug!(
        "{}: {} page(s), first page {:?} pt",
        metadata.file_name,
        info.page_count,
        info.first_page_pt
    );

    if let Some((width_pt, height_pt)) = info.first_page_pt {
        let width_cm = pt_to_cm(width_pt);
        let height_cm = pt_to_cm(height_pt);
        metadata.orientation = Some(Orientation::from_dimensions(width_cm, height_cm));
        metadata.width = Some(format_cm(width_cm));
        metadata.height = Some(format_cm(height_cm));
    }
    metadata.author = Some(info.author);
    metadata.creation_date = Some(info.creation_date);
}

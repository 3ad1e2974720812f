use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use cfv_container::ContainerMetadata;
use tempfile::TempDir;

use crate::DocumentId;

/// One open document.
///
/// Each session extracts its payload into its own directory under the
/// scratch directory, so two containers with the same file name never share
/// an extracted file.
#[derive(Debug)]
pub struct Session {
    pub container_path: PathBuf,
    /// Payload extracted into `scratch`
    pub extracted_path: PathBuf,
    pub metadata: ContainerMetadata,
    pub page_count: usize,
    scratch: TempDir,
}

impl Session {
    pub fn new(
        container_path: PathBuf,
        scratch: TempDir,
        extracted_path: PathBuf,
        metadata: ContainerMetadata,
        page_count: usize,
    ) -> Self {
        Self {
            container_path,
            extracted_path,
            metadata,
            page_count,
            scratch,
        }
    }

    /// Directory holding this session's extracted payload
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Delete the session's scratch directory and the payload in it
    pub fn close(self) {
        let dir = self.scratch.path().to_owned();
        match self.scratch.close() {
            Ok(()) => log::debug!("Removed {}", dir.display()),
            Err(e) => log::warn!("Could not remove {}: {}", dir.display(), e),
        }
    }
}

/// Open documents, keyed by handle
#[derive(Debug, Default)]
pub struct ViewerState {
    documents: HashMap<DocumentId, Session>,
    next_doc_id: AtomicU64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> DocumentId {
        DocumentId(self.next_doc_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn add_document(&mut self, doc_id: DocumentId, session: Session) {
        self.documents.insert(doc_id, session);
    }

    pub fn get_document(&self, doc_id: &DocumentId) -> Option<&Session> {
        self.documents.get(doc_id)
    }

    pub fn remove_document(&mut self, doc_id: DocumentId) -> Option<Session> {
        self.documents.remove(&doc_id)
    }

    /// Handles of every open document, oldest first
    pub fn open_documents(&self) -> Vec<DocumentId> {
        let mut ids: Vec<_> = self.documents.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(root: &Path, name: &str) -> Session {
        let scratch = tempfile::Builder::new()
            .prefix("session-")
            .tempdir_in(root)
            .unwrap();
        let extracted_path = scratch.path().join(format!("extracted_{}.pdf", name));
        std::fs::write(&extracted_path, b"%PDF").unwrap();
        Session::new(
            PathBuf::from(format!("{}.myext", name)),
            scratch,
            extracted_path,
            ContainerMetadata::new("pdf", format!("{}.pdf", name)),
            1,
        )
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let root = TempDir::new().unwrap();
        let mut state = ViewerState::new();
        let a = state.next_id();
        let b = state.next_id();
        state.add_document(b, session(root.path(), "b"));
        state.add_document(a, session(root.path(), "a"));
        assert_ne!(a, b);
        assert_eq!(state.open_documents(), vec![a, b]);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_same_name_sessions_do_not_share_files() {
        let root = TempDir::new().unwrap();
        let first = session(root.path(), "doc");
        let second = session(root.path(), "doc");
        assert_ne!(first.extracted_path, second.extracted_path);
        assert_ne!(first.scratch_dir(), second.scratch_dir());
    }

    #[test]
    fn test_close_removes_scratch_dir() {
        let root = TempDir::new().unwrap();
        let mut state = ViewerState::new();
        let id = state.next_id();
        state.add_document(id, session(root.path(), "a"));

        let removed = state.remove_document(id).unwrap();
        assert_eq!(removed.metadata.file_name, "a.pdf");
        assert!(state.is_empty());

        let dir = removed.scratch_dir().to_owned();
        let extracted = removed.extracted_path.clone();
        assert!(extracted.exists());
        removed.close();
        assert!(!dir.exists());
        assert!(!extracted.exists());
    }
}

//! Document access: which log files exist and what they contain

use crate::error::DocumentError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

const LOG_EXTENSION: &str = "log";

/// Source of log documents, identified by URI
pub trait DocumentStore {
    /// URIs of every known log document
    fn list_documents(&self) -> Result<Vec<String>, DocumentError>;

    /// Current full text of a document
    fn get_text(&self, uri: &str) -> Result<String, DocumentError>;

    /// URI for a file name relative to the workspace root
    fn resolve_relative_path(&self, path: &str) -> String;
}

/// Log files under a workspace directory, with in-memory buffers overriding file contents
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    open_documents: HashMap<String, String>,
}

impl Workspace {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|source| DocumentError::Io {
            uri: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root,
            open_documents: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve `text` for `uri` instead of the file on disk until closed
    pub fn open_document(&mut self, uri: &str, text: String) {
        self.open_documents.insert(uri.to_string(), text);
    }

    pub fn close_document(&mut self, uri: &str) {
        self.open_documents.remove(uri);
    }

    /// URI for a path on disk
    pub fn uri_for_path(&self, path: &Path) -> String {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        match Url::from_file_path(&path) {
            Ok(url) => url.to_string(),
            Err(()) => format!("file://{}", path.display()),
        }
    }

    fn read_dir_sorted(&self, dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
        let entries = std::fs::read_dir(dir).map_err(|source| DocumentError::Io {
            uri: self.uri_for_path(dir),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();
        Ok(paths)
    }
}

fn is_log_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
}

fn path_from_uri(uri: &str) -> Result<PathBuf, DocumentError> {
    Url::parse(uri)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| DocumentError::InvalidUri(uri.to_string()))
}

impl DocumentStore for Workspace {
    /// `.log` files in the root, then in each direct subdirectory (one folder per service instance)
    fn list_documents(&self) -> Result<Vec<String>, DocumentError> {
        let root_entries = self.read_dir_sorted(&self.root)?;

        let mut documents: Vec<String> = root_entries
            .iter()
            .filter(|p| is_log_file(p))
            .map(|p| self.uri_for_path(p))
            .collect();

        for dir in root_entries.iter().filter(|p| p.is_dir()) {
            // An unreadable instance folder should not hide the rest of the workspace
            let files = match self.read_dir_sorted(dir) {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            documents.extend(
                files
                    .iter()
                    .filter(|p| is_log_file(p))
                    .map(|p| self.uri_for_path(p)),
            );
        }

        Ok(documents)
    }

    fn get_text(&self, uri: &str) -> Result<String, DocumentError> {
        if let Some(text) = self.open_documents.get(uri) {
            return Ok(text.clone());
        }

        let path = path_from_uri(uri)?;
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DocumentError::NotFound(uri.to_string())
            } else {
                DocumentError::Io {
                    uri: uri.to_string(),
                    source,
                }
            }
        })
    }

    fn resolve_relative_path(&self, path: &str) -> String {
        self.uri_for_path(&self.root.join(path))
    }
}

/// Fixed set of in-memory documents, listed in insertion order
#[derive(Debug, Default, Clone)]
pub struct MemoryDocuments {
    documents: Vec<(String, String)>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document
    pub fn insert(&mut self, uri: &str, text: &str) {
        match self.documents.iter_mut().find(|(u, _)| u == uri) {
            Some((_, existing)) => *existing = text.to_string(),
            None => self.documents.push((uri.to_string(), text.to_string())),
        }
    }

    pub fn with(mut self, uri: &str, text: &str) -> Self {
        self.insert(uri, text);
        self
    }
}

impl DocumentStore for MemoryDocuments {
    fn list_documents(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.documents.iter().map(|(uri, _)| uri.clone()).collect())
    }

    fn get_text(&self, uri: &str) -> Result<String, DocumentError> {
        self.documents
            .iter()
            .find(|(u, _)| u == uri)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| DocumentError::NotFound(uri.to_string()))
    }

    /// In-memory URIs are the relative paths themselves
    fn resolve_relative_path(&self, path: &str) -> String {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_workspace() -> tempfile::TempDir {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Pccis0")).unwrap();
        fs::create_dir_all(root.join("Pccis1")).unwrap();
        fs::write(root.join("Pccis0/ImagingServices.log"), "PCCIS instance 0 log").unwrap();
        fs::write(root.join("Pccis1/ImagingServices.log"), "PCCIS instance 1 log").unwrap();
        fs::write(root.join("some-text.txt"), "some text file").unwrap();
        fs::write(root.join("ContentConversionService.log"), "CCS log").unwrap();
        fs::write(root.join("PDFConversionService.log"), "PDFCS log").unwrap();
        temp
    }

    #[test]
    fn test_list_documents_order() {
        let temp = sample_workspace();
        let workspace = Workspace::new(temp.path()).unwrap();
        let documents = workspace.list_documents().unwrap();

        assert_eq!(documents.len(), 4);
        assert!(documents[0].ends_with("/ContentConversionService.log"));
        assert!(documents[1].ends_with("/PDFConversionService.log"));
        assert!(documents[2].ends_with("/Pccis0/ImagingServices.log"));
        assert!(documents[3].ends_with("/Pccis1/ImagingServices.log"));
        assert!(documents.iter().all(|uri| uri.starts_with("file://")));
    }

    #[test]
    fn test_get_text_from_disk() {
        let temp = sample_workspace();
        let workspace = Workspace::new(temp.path()).unwrap();
        let uri = workspace.resolve_relative_path("PDFConversionService.log");
        assert_eq!(workspace.get_text(&uri).unwrap(), "PDFCS log");
    }

    #[test]
    fn test_open_document_overrides_disk() {
        let temp = sample_workspace();
        let mut workspace = Workspace::new(temp.path()).unwrap();
        let uri = workspace.resolve_relative_path("PDFConversionService.log");

        workspace.open_document(&uri, "edited buffer".to_string());
        assert_eq!(workspace.get_text(&uri).unwrap(), "edited buffer");

        workspace.close_document(&uri);
        assert_eq!(workspace.get_text(&uri).unwrap(), "PDFCS log");
    }

    #[test]
    fn test_get_text_missing_file() {
        let temp = sample_workspace();
        let workspace = Workspace::new(temp.path()).unwrap();
        let uri = workspace.resolve_relative_path("OfficeConversionService.log");
        assert!(matches!(
            workspace.get_text(&uri),
            Err(DocumentError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_text_invalid_uri() {
        let temp = sample_workspace();
        let workspace = Workspace::new(temp.path()).unwrap();
        assert!(matches!(
            workspace.get_text("not a uri"),
            Err(DocumentError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_memory_documents() {
        let mut docs = MemoryDocuments::new().with("a.log", "one").with("b.log", "two");
        docs.insert("a.log", "three");
        assert_eq!(docs.list_documents().unwrap(), vec!["a.log", "b.log"]);
        assert_eq!(docs.get_text("a.log").unwrap(), "three");
        assert!(docs.get_text("c.log").is_err());
    }
}

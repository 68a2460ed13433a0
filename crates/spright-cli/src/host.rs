//! File system and terminal implementations of the editor host traits.

use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use log::{debug, error, info};

use spright_diagnostics::DiagnosticSet;
use spright_preview::host::{DiagnosticsHost, DocumentHost, DocumentSnapshot, HostError};

use crate::error_adapter;

/// A configuration document stored in a file.
///
/// Remembers the text of the last snapshot, which is the text the
/// diagnostics of the current cycle refer to.
#[derive(Debug)]
pub struct FileDocument {
    path: PathBuf,
    last_snapshot: Mutex<String>,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_snapshot: Mutex::new(String::new()),
        }
    }

    /// Returns the text of the most recent snapshot.
    pub fn last_snapshot(&self) -> String {
        self.last_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DocumentHost for FileDocument {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn snapshot(&self) -> Result<DocumentSnapshot, HostError> {
        let text = fs::read_to_string(&self.path)?;
        *self
            .last_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = text.clone();
        Ok(DocumentSnapshot::new(&self.path, text))
    }

    fn replace_all(&self, text: &str) -> Result<(), HostError> {
        fs::write(&self.path, text)?;
        info!(path = self.path.display().to_string(); "Document rewritten");
        Ok(())
    }
}

/// Reports diagnostics as miette reports through the log.
#[derive(Debug)]
pub struct TerminalDiagnostics {
    document: Arc<FileDocument>,
}

impl TerminalDiagnostics {
    pub fn new(document: Arc<FileDocument>) -> Self {
        Self { document }
    }
}

impl DiagnosticsHost for TerminalDiagnostics {
    fn publish(&self, diagnostics: &DiagnosticSet) {
        if diagnostics.is_empty() {
            info!(path = self.document.path.display().to_string(); "No diagnostics");
            return;
        }

        let source = self.document.last_snapshot();
        for reportable in error_adapter::diagnostic_reportables(diagnostics, &source) {
            error!("{}", error_adapter::render(&reportable));
        }
    }

    fn clear(&self) {
        debug!("Diagnostics hidden");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_snapshot_remembers_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.conf");
        fs::write(&path, "sheet atlas\n").unwrap();
        let document = FileDocument::new(&path);

        let snapshot = document.snapshot().unwrap();

        assert_eq!(snapshot.text(), "sheet atlas\n");
        assert_eq!(snapshot.path(), path);
        assert_eq!(document.last_snapshot(), "sheet atlas\n");
    }

    #[test]
    fn test_replace_all_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.conf");
        fs::write(&path, "sheet   atlas\n").unwrap();
        let document = FileDocument::new(&path);

        document.replace_all("sheet atlas\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "sheet atlas\n");
    }

    #[test]
    fn test_missing_file_is_host_error() {
        let dir = tempdir().unwrap();
        let document = FileDocument::new(dir.path().join("absent.conf"));

        assert!(matches!(document.snapshot(), Err(HostError::Io(_))));
        assert_eq!(document.last_snapshot(), "");
    }
}

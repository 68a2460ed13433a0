//! Seams to the environment that owns the document.
//!
//! The host stores the configuration document, applies edits to it and
//! displays diagnostics. [`MemoryDocument`] is a host document kept in
//! memory, for embedding and tests.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use thiserror::Error;

use spright_diagnostics::DiagnosticSet;

/// Errors reported by a host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("document is no longer available: {0}")]
    Unavailable(String),
}

/// The text of a document at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    path: PathBuf,
    text: String,
}

impl DocumentSnapshot {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Access to the configuration document.
pub trait DocumentHost: Send + Sync {
    /// Returns the document location.
    fn path(&self) -> PathBuf;

    /// Reads the current document text.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the document cannot be read.
    fn snapshot(&self) -> Result<DocumentSnapshot, HostError>;

    /// Replaces the whole document text.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the edit cannot be applied.
    fn replace_all(&self, text: &str) -> Result<(), HostError>;
}

/// Display of diagnostics attached to the document.
pub trait DiagnosticsHost: Send + Sync {
    /// Shows `diagnostics`, replacing whatever was shown before.
    fn publish(&self, diagnostics: &DiagnosticSet);

    /// Removes all shown diagnostics.
    fn clear(&self);
}

/// A document held in memory.
///
/// # Examples
///
/// ```
/// # use spright_preview::host::{DocumentHost, MemoryDocument};
/// let document = MemoryDocument::new("sprites/sheet.conf", "sheet");
/// document.replace_all("sheet \"atlas\"").unwrap();
/// assert_eq!(document.text(), "sheet \"atlas\"");
/// ```
#[derive(Debug)]
pub struct MemoryDocument {
    path: PathBuf,
    text: Mutex<String>,
}

impl MemoryDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: Mutex::new(text.into()),
        }
    }

    /// Returns a copy of the current text.
    pub fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the text, as a user edit would.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }
}

impl DocumentHost for MemoryDocument {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn snapshot(&self) -> Result<DocumentSnapshot, HostError> {
        Ok(DocumentSnapshot::new(self.path.clone(), self.text()))
    }

    fn replace_all(&self, text: &str) -> Result<(), HostError> {
        self.set_text(text);
        Ok(())
    }
}

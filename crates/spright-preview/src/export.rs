//! Drawing of preview views into output formats.
//!
//! # Pipeline Position
//!
//! ```text
//! SyncState
//!     ↓ presenter (parse config, layout description)
//! View
//!     ↓ export (this module)
//! Output text
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgRenderer`]

pub mod svg;

use std::{fs, io, path::Path};

use log::info;
use thiserror::Error;

use crate::presenter::View;

pub use self::svg::SvgRenderer;

/// Errors that can occur while drawing a view.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Abstraction for drawing targets.
pub trait Renderer {
    /// Draws `view` and returns the output document.
    ///
    /// Drawing the same view twice gives identical output.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Render`] if the view cannot be expressed in
    /// the target format.
    fn render(&self, view: &View) -> Result<String, ExportError>;

    /// Draws `view` into the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Render`] if drawing fails, or
    /// [`ExportError::Io`] if the file cannot be written.
    fn render_to_file(&self, view: &View, path: &Path) -> Result<(), ExportError> {
        let output = self.render(view)?;
        fs::write(path, output)?;
        info!(path = path.display().to_string(); "Preview written");
        Ok(())
    }
}

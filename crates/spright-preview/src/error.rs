//! Error types for preview operations.
//!
//! Each stage has its own error type next to the code that raises it:
//! [`ToolError`] for tool processes, [`RefreshError`] for refresh cycles,
//! [`HostError`] for document access and [`ExportError`] for drawing.
//! [`PreviewError`] wraps all of them for callers that drive the whole
//! pipeline.

use std::io;

use thiserror::Error;

use crate::{export::ExportError, host::HostError, orchestrator::RefreshError, tool::ToolError};

/// The main error type of the preview crate.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Message error: {0}")]
    Message(#[from] serde_json::Error),
}

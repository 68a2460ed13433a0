//! One refresh cycle: tool runs, diagnostics and the new preview state.
//!
//! ```text
//! document text ──autocomplete──► config text ──describe──► Description JSON
//!                      │                                          │
//!                      ▼ stderr                                   ▼ validate, derive uris
//!                 diagnostics                               SyncState
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use spright_core::description::{Description, DescriptionError};
use spright_diagnostics::{DocumentLines, parse_tool_output};

use crate::{
    diagnostics_channel::DiagnosticsChannel,
    host::{DocumentSnapshot, HostError},
    tool::{Operation, ToolError, ToolInvoker, ToolResult},
};

/// Errors that abort a refresh cycle.
///
/// None of them is fatal; the previous state stays in place and the next
/// change starts a new cycle.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("tool invocation failed: {0}")]
    Tool(#[from] ToolError),

    #[error("malformed description: {0}")]
    MalformedDescription(#[from] DescriptionError),

    #[error("document unavailable: {0}")]
    Host(#[from] HostError),
}

/// The preview state derived from one document text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    config: String,
    description: Description,
}

impl SyncState {
    pub fn new(config: impl Into<String>, description: Description) -> Self {
        Self {
            config: config.into(),
            description,
        }
    }

    /// Returns the normalized configuration text.
    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Consumes the state, returning the config text and the description.
    pub fn into_parts(self) -> (String, Description) {
        (self.config, self.description)
    }
}

/// Runs refresh cycles against a tool.
#[derive(Clone)]
pub struct SyncOrchestrator {
    tool: Arc<dyn ToolInvoker>,
}

impl SyncOrchestrator {
    pub fn new(tool: Arc<dyn ToolInvoker>) -> Self {
        Self { tool }
    }

    /// Derives a new [`SyncState`] from `snapshot`.
    ///
    /// Diagnostics from the autocomplete run replace the channel's set as
    /// soon as they are known, so they survive a later failure in the
    /// same cycle.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The document text read for this cycle.
    /// * `diagnostics` - Channel receiving the cycle's diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Tool`] if a tool run could not be started, or
    /// [`RefreshError::MalformedDescription`] if the describe output is not a
    /// valid description.
    pub async fn refresh(
        &self,
        snapshot: &DocumentSnapshot,
        diagnostics: &DiagnosticsChannel,
    ) -> Result<SyncState, RefreshError> {
        let path = snapshot.path();

        let completed = self
            .tool
            .invoke(Operation::Autocomplete, path, snapshot.text())
            .await?;

        let lines = DocumentLines::new(snapshot.text());
        diagnostics.replace(parse_tool_output(completed.stderr(), &lines));

        let described = self
            .tool
            .invoke(Operation::Describe, path, completed.stdout())
            .await?;

        let mut description = Description::from_json(described.stdout()).inspect_err(|err| {
            warn!(err:% = err; "Discarding tool description");
        })?;
        resolve_source_uris(&mut description, path);

        info!(
            inputs = description.inputs().len(),
            sources = description.sources().len(),
            sprites = description.sprites().len();
            "Refresh cycle produced a description"
        );

        Ok(SyncState::new(completed.into_stdout(), description))
    }

    /// Runs autocomplete on arbitrary text and logs the output.
    ///
    /// Debug aid for the preview; the result does not touch any state.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the tool could not be started.
    pub async fn debug_run(&self, document_path: &Path, text: &str) -> Result<ToolResult, ToolError> {
        let result = self
            .tool
            .invoke(Operation::Autocomplete, document_path, text)
            .await?;
        info!(stdout = result.stdout(), stderr = result.stderr(); "Debug tool run");
        Ok(result)
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator").finish_non_exhaustive()
    }
}

/// Sets every source's uri to the file URL of its image.
///
/// Image paths are relative to the document's directory, which is itself
/// made absolute against the working directory.
pub fn resolve_source_uris(description: &mut Description, document_path: &Path) {
    let document_dir = document_path.parent().unwrap_or_else(|| Path::new(""));

    for source in description.sources_mut() {
        let image: PathBuf = document_dir.join(source.path()).join(source.filename());
        let absolute = match std::path::absolute(&image) {
            Ok(absolute) => absolute,
            Err(err) => {
                warn!(path = image.display().to_string(), err:err; "Cannot make image path absolute");
                continue;
            }
        };

        match Url::from_file_path(&absolute) {
            Ok(url) => source.set_uri(url.to_string()),
            Err(()) => {
                warn!(path = absolute.display().to_string(); "Cannot express image path as URL");
            }
        }
    }
    debug!(count = description.sources().len(); "Resolved source uris");
}

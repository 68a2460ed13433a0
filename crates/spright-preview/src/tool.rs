//! Out-of-process invocation of the `spright` tool.
//!
//! The tool is run as `spright <operation> <document path>` with the input
//! text on stdin. Whatever it prints is returned as a [`ToolResult`]; a
//! non-zero exit status is not an error, because the tool reports problems
//! on stderr. Only failing to start the process or to talk to it is.

use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use log::{debug, trace};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::config::ToolConfig;

/// Errors raised when the tool process cannot be used.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to communicate with `{program}`: {source}")]
    Pipe {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// The tool operations used by the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Completes a raw configuration into its normalized form.
    Autocomplete,
    /// Reports the render geometry of a normalized configuration as JSON.
    Describe,
}

impl Operation {
    /// Returns the command-line name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Autocomplete => "autocomplete",
            Self::Describe => "describe",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured output of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolResult {
    stdout: String,
    stderr: String,
}

impl ToolResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Consumes the result, returning its stdout.
    pub fn into_stdout(self) -> String {
        self.stdout
    }
}

/// Runs tool operations.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Runs `operation` for the document at `document_path` with `input` on stdin.
    ///
    /// # Arguments
    ///
    /// * `operation` - The tool operation to run.
    /// * `document_path` - Path of the configuration document; the tool
    ///   resolves relative input paths against its directory.
    /// * `input` - Configuration text written to the tool's stdin.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] only when the tool cannot be started or its
    /// pipes fail. Problems reported by the tool are part of the result.
    async fn invoke(
        &self,
        operation: Operation,
        document_path: &Path,
        input: &str,
    ) -> Result<ToolResult, ToolError>;
}

/// Invokes the tool as a child process.
#[derive(Debug, Clone)]
pub struct ProcessTool {
    program: PathBuf,
}

impl ProcessTool {
    /// Creates an invoker for the binary at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Creates an invoker for the configured binary.
    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.path())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn pipe_error(&self, source: io::Error) -> ToolError {
        ToolError::Pipe {
            program: self.program_name(),
            source,
        }
    }
}

#[async_trait]
impl ToolInvoker for ProcessTool {
    async fn invoke(
        &self,
        operation: Operation,
        document_path: &Path,
        input: &str,
    ) -> Result<ToolResult, ToolError> {
        debug!(
            program = self.program_name(),
            operation = operation.as_str(),
            document = document_path.display().to_string();
            "Invoking tool"
        );

        let mut child = Command::new(&self.program)
            .arg(operation.as_str())
            .arg(document_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: self.program_name(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.pipe_error(io::Error::other("stdin was not captured")))?;

        // Feed stdin while draining stdout and stderr, so neither side blocks on a full pipe
        let write_input = async move {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (written, output) = tokio::join!(write_input, child.wait_with_output());

        let output = output.map_err(|err| self.pipe_error(err))?;
        match written {
            Ok(()) => {}
            // The tool may exit without reading all of its input
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                trace!(operation = operation.as_str(); "Tool closed stdin early");
            }
            Err(err) => return Err(self.pipe_error(err)),
        }

        debug!(
            operation = operation.as_str(),
            status = output.status.to_string(),
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len();
            "Tool finished"
        );

        Ok(ToolResult::new(
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Autocomplete.as_str(), "autocomplete");
        assert_eq!(Operation::Describe.to_string(), "describe");
    }

    #[test]
    fn test_from_config() {
        let tool = ProcessTool::from_config(&ToolConfig::new("/usr/local/bin/spright"));
        assert_eq!(tool.program(), Path::new("/usr/local/bin/spright"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_missing_binary_is_spawn_error() {
        let tool = ProcessTool::new("/nonexistent/spright-preview-test/spright");
        let err = tool
            .invoke(Operation::Autocomplete, Path::new("sheet.conf"), "sheet")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}

//! Watch mode: keeps the output file in sync with the input file.
//!
//! The input's modification time is polled and every change is fed to an
//! [`EditorSession`] as [`SessionEvent::DocumentChanged`]. The session
//! coalesces bursts of changes, so polling faster than the tool runs is
//! harmless.

use std::{
    fs,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, SystemTime},
};

use log::{debug, info, warn};
use tokio::{
    sync::mpsc::{self, UnboundedSender, WeakUnboundedSender},
    time::MissedTickBehavior,
};

use spright_core::config_model::ConfigModel;
use spright_preview::{
    PreviewError,
    config::AppConfig,
    export::{Renderer, SvgRenderer},
    message::{FromPreview, ToPreview},
    presenter::View,
    session::{EditorSession, Focus, SessionEvent, ViewSink},
    tool::ProcessTool,
};

use crate::{
    args::{Args, OutputFormat},
    host::{FileDocument, TerminalDiagnostics},
    write_message,
};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Writes every new preview to the output file.
struct OutputSink {
    output: PathBuf,
    format: OutputFormat,
    renderer: SvgRenderer,
    // Weak, so the event channel still closes when polling stops
    normalize: Option<WeakUnboundedSender<SessionEvent>>,
}

impl ViewSink for OutputSink {
    fn state_delivered(&mut self, message: &ToPreview) {
        if self.format == OutputFormat::Json {
            if let Err(err) = write_message(message, &self.output) {
                warn!(err:err; "Could not write preview state");
            }
        }

        let Some(events) = self.normalize.as_ref().and_then(WeakUnboundedSender::upgrade) else {
            return;
        };
        if let Some(text) = normalized_text(message) {
            debug!("Requesting normalization of the document");
            let update = FromPreview::UpdateConfig { text };
            if events.send(SessionEvent::FromPreview(update)).is_err() {
                debug!("Session stopped before normalization");
            }
        }
    }

    fn show(&mut self, view: &View) {
        if self.format == OutputFormat::Svg {
            if let Err(err) = self.renderer.render_to_file(view, &self.output) {
                warn!(err:err; "Could not write preview");
            }
        }
    }
}

/// Returns the normalized configuration if it differs from the delivered one.
fn normalized_text(message: &ToPreview) -> Option<String> {
    let ToPreview::SetConfig { config, .. } = message;
    let normalized = ConfigModel::parse(config).ok()?.to_string();
    (normalized != *config).then_some(normalized)
}

/// Runs a session for the input file until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the input file does not exist or the configuration
/// cannot build a session. Failures of single refresh cycles are logged and
/// do not stop watching.
pub(crate) async fn watch(args: &Args, config: &AppConfig) -> Result<(), PreviewError> {
    fs::metadata(&args.input)?;

    let document = Arc::new(FileDocument::new(&args.input));
    let diagnostics = Arc::new(TerminalDiagnostics::new(Arc::clone(&document)));
    let tool = Arc::new(ProcessTool::from_config(config.tool()));
    let (events, receiver) = mpsc::unbounded_channel();

    let sink = OutputSink {
        output: PathBuf::from(&args.output),
        format: args.format,
        renderer: SvgRenderer::new(config.style())?,
        normalize: args.normalize.then(|| events.downgrade()),
    };
    let mut session = EditorSession::new(
        document,
        diagnostics,
        tool,
        config,
        Focus::Active,
        Box::new(sink),
    )?;

    info!(input_path = args.input; "Watching for changes, press Ctrl-C to stop");

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(err:err; "Could not listen for Ctrl-C, watching until killed");
            std::future::pending::<()>().await;
        }
    };
    tokio::join!(
        session.run(receiver),
        poll_changes(PathBuf::from(&args.input), events, shutdown)
    );

    Ok(())
}

/// Sends a change event whenever the modification time of `path` changes.
///
/// Returns when `shutdown` completes or the session is gone. Dropping
/// `events` on return lets the session finish.
async fn poll_changes(
    path: PathBuf,
    events: UnboundedSender<SessionEvent>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_modified = modified(&path);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Stopping watch");
                break;
            }
            _ = interval.tick() => {
                let Some(current) = modified(&path) else {
                    continue;
                };
                if last_modified == Some(current) {
                    continue;
                }
                last_modified = Some(current);
                debug!(path = path.display().to_string(); "Input changed");
                if events.send(SessionEvent::DocumentChanged).is_err() {
                    break;
                }
            }
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .inspect_err(|err| debug!(path = path.display().to_string(), err:%; "Cannot stat input"))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use spright_core::description::Description;
    use spright_preview::orchestrator::SyncState;
    use tempfile::tempdir;
    use tokio::time::sleep;

    use super::*;

    fn touch(path: &Path, offset_secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(offset_secs))
            .unwrap();
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_poll_reports_each_modification_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.conf");
        fs::write(&path, "sheet atlas\n").unwrap();
        let (events, mut receiver) = mpsc::unbounded_channel();

        let edits = {
            let path = path.clone();
            async move {
                sleep(Duration::from_millis(600)).await;
                touch(&path, 10);
                sleep(Duration::from_millis(600)).await;
                touch(&path, 20);
            }
        };
        tokio::join!(
            poll_changes(path, events, sleep(Duration::from_secs(3))),
            edits
        );

        let mut received = Vec::new();
        while let Some(event) = receiver.recv().await {
            received.push(event);
        }
        assert_eq!(
            received,
            [SessionEvent::DocumentChanged, SessionEvent::DocumentChanged]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_poll_ignores_missing_file() {
        let dir = tempdir().unwrap();
        let (events, mut receiver) = mpsc::unbounded_channel();

        poll_changes(dir.path().join("absent.conf"), events, sleep(Duration::from_secs(2))).await;

        assert!(receiver.recv().await.is_none());
    }

    #[test]
    fn test_normalized_text() {
        let message = |config: &str| ToPreview::from(SyncState::new(config, Description::default()));

        assert_eq!(
            normalized_text(&message("sheet    atlas\n")).as_deref(),
            Some("sheet atlas\n")
        );
        assert_eq!(normalized_text(&message("sheet atlas\n")), None);
        assert_eq!(normalized_text(&message("sheet \"atlas\n")), None);
    }
}

//! An editor session: one document, its preview and its diagnostics.
//!
//! [`EditorSession::run`] consumes [`SessionEvent`]s until the event channel
//! closes. Refresh cycles and debug runs of the tool run concurrently with
//! event handling, so zoom and focus changes stay responsive while the tool
//! is busy; document changes during a cycle only queue the next one.
//!
//! ```text
//! events ──► scheduler ──► cycle (settle delay, snapshot, refresh) ──► presenter ──► sink
//!                ▲                                                │
//!                └──────────────────── completed ◄────────────────┘
//! ```

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use log::{debug, info, warn};
use tokio::{sync::mpsc, task::JoinSet};

use spright_core::zoom::ZoomDirection;

use crate::{
    config::AppConfig,
    diagnostics_channel::DiagnosticsChannel,
    error::PreviewError,
    host::{DiagnosticsHost, DocumentHost},
    message::{FromPreview, ToPreview},
    orchestrator::{RefreshError, SyncOrchestrator, SyncState},
    presenter::{Presenter, View},
    scheduler::UpdateScheduler,
    tool::ToolInvoker,
};

/// Whether the document is the one the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Active,
    Inactive,
}

/// Inputs to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The document text changed.
    DocumentChanged,
    /// The document gained or lost focus.
    FocusChanged(Focus),
    /// The user zoomed the preview.
    Zoom(ZoomDirection),
    /// The preview sent a message.
    FromPreview(FromPreview),
}

/// Receives what the preview displays.
pub trait ViewSink: Send {
    /// Called with the state of every successful refresh cycle, before the
    /// view built from it is shown.
    fn state_delivered(&mut self, _message: &ToPreview) {}

    /// Shows `view`, replacing the previous one.
    fn show(&mut self, view: &View);
}

type Cycle = Pin<Box<dyn Future<Output = Result<SyncState, RefreshError>> + Send>>;

/// Keeps one document and its preview in sync.
pub struct EditorSession {
    document: Arc<dyn DocumentHost>,
    diagnostics: Arc<DiagnosticsChannel>,
    orchestrator: SyncOrchestrator,
    scheduler: UpdateScheduler,
    presenter: Presenter,
    sink: Box<dyn ViewSink>,
}

impl EditorSession {
    /// Creates a session for `document`.
    ///
    /// # Arguments
    ///
    /// * `document` - The configuration document.
    /// * `diagnostics_host` - Where diagnostics are displayed.
    /// * `tool` - Runs the `spright` operations.
    /// * `config` - Timing and layout settings.
    /// * `focus` - Whether the document is shown when the session starts.
    ///   Diagnostics reach the host only while it is.
    /// * `sink` - Receives every new view.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Config`] if the configured default zoom is
    /// not a zoom level.
    pub fn new(
        document: Arc<dyn DocumentHost>,
        diagnostics_host: Arc<dyn DiagnosticsHost>,
        tool: Arc<dyn ToolInvoker>,
        config: &AppConfig,
        focus: Focus,
        sink: Box<dyn ViewSink>,
    ) -> Result<Self, PreviewError> {
        let zoom = config.layout().zoom_level().map_err(PreviewError::Config)?;
        let visible = focus == Focus::Active;
        Ok(Self {
            document,
            diagnostics: Arc::new(DiagnosticsChannel::new(diagnostics_host, visible)),
            orchestrator: SyncOrchestrator::new(tool),
            scheduler: UpdateScheduler::new(config.scheduler().settle_delay()),
            presenter: Presenter::new(config.layout().clone(), zoom),
            sink,
        })
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn diagnostics(&self) -> &DiagnosticsChannel {
        &self.diagnostics
    }

    /// Runs the session until `events` closes.
    ///
    /// The first cycle starts immediately. After the channel closes, the
    /// cycle in flight, any queued cycle and pending debug runs still run to
    /// completion.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        let document_path = self.document.path();
        info!(document = document_path.display().to_string(); "Session started");

        let mut cycle: Option<Cycle> = None;
        if self.scheduler.start_initial() {
            cycle = Some(self.start_cycle(Duration::ZERO));
        }

        let mut debug_runs = JoinSet::new();
        let mut open = true;
        while open || cycle.is_some() || !debug_runs.is_empty() {
            tokio::select! {
                result = async {
                    match cycle.as_mut() {
                        Some(running) => running.await,
                        None => std::future::pending().await,
                    }
                } => {
                    cycle = None;
                    self.apply(result);
                    if self.scheduler.cycle_completed() {
                        cycle = Some(self.start_cycle(self.scheduler.settle_delay()));
                    }
                }
                Some(finished) = debug_runs.join_next(), if !debug_runs.is_empty() => {
                    if let Err(err) = finished {
                        warn!(err:err; "Debug tool run aborted");
                    }
                }
                event = events.recv(), if open => {
                    match event {
                        Some(event) => {
                            if self.handle_event(event, &mut debug_runs) {
                                cycle = Some(self.start_cycle(self.scheduler.settle_delay()));
                            }
                        }
                        None => {
                            debug!("Event channel closed, finishing remaining cycles");
                            open = false;
                        }
                    }
                }
            }
        }

        info!(document = document_path.display().to_string(); "Session finished");
    }

    /// Handles one event. Returns `true` if a cycle must start.
    fn handle_event(&mut self, event: SessionEvent, debug_runs: &mut JoinSet<()>) -> bool {
        debug!(event:?; "Session event");
        match event {
            SessionEvent::DocumentChanged => return self.scheduler.notify_changed(),
            SessionEvent::FocusChanged(Focus::Active) => self.diagnostics.show(),
            SessionEvent::FocusChanged(Focus::Inactive) => self.diagnostics.hide(),
            SessionEvent::Zoom(direction) => {
                let view = self.presenter.zoom(direction);
                self.sink.show(view);
            }
            SessionEvent::FromPreview(FromPreview::UpdateConfig { text }) => {
                match self.document.replace_all(&text) {
                    // The replaced text needs a cycle like any other edit
                    Ok(()) => return self.scheduler.notify_changed(),
                    Err(err) => warn!(err:err; "Could not replace document"),
                }
            }
            SessionEvent::FromPreview(FromPreview::ExecSpright { text }) => {
                // Runs beside the session; its result only reaches the log
                let orchestrator = self.orchestrator.clone();
                let document_path = self.document.path();
                debug_runs.spawn(async move {
                    if let Err(err) = orchestrator.debug_run(&document_path, &text).await {
                        warn!(err:err; "Debug tool run failed");
                    }
                });
            }
        }
        false
    }

    fn start_cycle(&self, settle_delay: Duration) -> Cycle {
        let document = Arc::clone(&self.document);
        let diagnostics = Arc::clone(&self.diagnostics);
        let orchestrator = self.orchestrator.clone();

        Box::pin(async move {
            if !settle_delay.is_zero() {
                tokio::time::sleep(settle_delay).await;
            }
            let snapshot = document.snapshot()?;
            orchestrator.refresh(&snapshot, &diagnostics).await
        })
    }

    fn apply(&mut self, result: Result<SyncState, RefreshError>) {
        match result {
            Ok(state) => {
                let message = ToPreview::from(state);
                self.sink.state_delivered(&message);
                let view = self.presenter.on_message(message);
                self.sink.show(view);
            }
            Err(err) => {
                warn!(err:err; "Refresh cycle failed, keeping the previous preview");
            }
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("scheduler", &self.scheduler)
            .field("presenter", &self.presenter)
            .finish_non_exhaustive()
    }
}

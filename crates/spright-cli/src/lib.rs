//! CLI logic for the spright sprite sheet previewer.
//!
//! One-shot mode runs a single refresh cycle on the input and writes the
//! preview. Watch mode keeps refreshing the output until interrupted.

pub mod error_adapter;

mod args;
mod config;
mod host;
mod watch;

pub use args::{Args, OutputFormat};

use std::{fs, path::Path, sync::Arc};

use log::{debug, info, warn};

use spright_preview::{
    PreviewError,
    config::AppConfig,
    diagnostics_channel::DiagnosticsChannel,
    export::{Renderer, SvgRenderer},
    host::{DocumentHost, DocumentSnapshot},
    message::ToPreview,
    orchestrator::SyncOrchestrator,
    presenter::Presenter,
    tool::ProcessTool,
};

use crate::host::{FileDocument, TerminalDiagnostics};

/// Run the previewer
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PreviewError` for:
/// - File I/O errors
/// - Configuration loading and validation errors
/// - Tool failures and malformed descriptions (one-shot mode)
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), PreviewError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        watch = args.watch;
        "Previewing sprite sheet"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args)?;
    debug!(config:? = app_config; "Effective configuration");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        if args.watch {
            watch::watch(args, &app_config).await
        } else {
            run_once(args, &app_config).await
        }
    })
}

async fn run_once(args: &Args, config: &AppConfig) -> Result<(), PreviewError> {
    let document = Arc::new(FileDocument::new(&args.input));
    let snapshot = document.snapshot()?;

    let diagnostics = DiagnosticsChannel::new(
        Arc::new(TerminalDiagnostics::new(Arc::clone(&document))),
        true,
    );
    let orchestrator = SyncOrchestrator::new(Arc::new(ProcessTool::from_config(config.tool())));
    let state = orchestrator.refresh(&snapshot, &diagnostics).await?;

    let zoom = config.layout().zoom_level().map_err(PreviewError::Config)?;
    let mut presenter = Presenter::new(config.layout().clone(), zoom);
    let message = ToPreview::from(state);
    let output = Path::new(&args.output);

    if args.format == OutputFormat::Json {
        write_message(&message, output)?;
    }
    let view = presenter.on_message(message);
    if args.format == OutputFormat::Svg {
        SvgRenderer::new(config.style())?.render_to_file(view, output)?;
    }

    if args.normalize {
        normalize(&presenter, &snapshot, document.as_ref())?;
    }

    info!(
        output_file = args.output,
        diagnostics = diagnostics.latest().len();
        "Preview exported successfully"
    );
    Ok(())
}

/// Writes the document back in normalized form if it is not already.
fn normalize(
    presenter: &Presenter,
    snapshot: &DocumentSnapshot,
    document: &dyn DocumentHost,
) -> Result<(), PreviewError> {
    match presenter.normalized_config() {
        Some(text) if text == snapshot.text() => debug!("Document already normalized"),
        Some(text) => document.replace_all(&text)?,
        None => warn!("Configuration could not be parsed, leaving the document unchanged"),
    }
    Ok(())
}

/// Writes `message` as JSON to `path`.
pub(crate) fn write_message(message: &ToPreview, path: &Path) -> Result<(), PreviewError> {
    fs::write(path, message.to_json()?)?;
    info!(path = path.display().to_string(); "Preview state written");
    Ok(())
}

//! Spright Preview
//!
//! Keeps a sprite sheet configuration document and its visual preview in
//! sync. The preview is derived by running the external `spright` tool on
//! the document and laying out the description it reports.
//!
//! # Pipeline
//!
//! ```text
//! edit ─► scheduler ─► tool (autocomplete, describe) ─► SyncState ─► layout ─► render
//!                           │
//!                           └─► diagnostics ─► host
//! ```
//!
//! # Overview
//!
//! - [`scheduler`] - Coalesces document changes into refresh cycles.
//! - [`tool`] - Runs the `spright` binary out of process.
//! - [`orchestrator`] - One refresh cycle from text to [`SyncState`].
//! - [`diagnostics_channel`] - Delivers diagnostics to the host.
//! - [`layout`] - Positions a description as a zoomable tree.
//! - [`presenter`] - Turns sync states into views.
//! - [`export`] - Draws views, for example as SVG.
//! - [`session`] - Wires everything together for one document.
//!
//! # Example
//!
//! ```
//! # use spright_core::description::Description;
//! # use spright_preview::{
//! #     config::AppConfig,
//! #     export::{Renderer, SvgRenderer},
//! #     orchestrator::SyncState,
//! #     presenter::Presenter,
//! # };
//! let config = AppConfig::default();
//! let mut presenter = Presenter::new(
//!     config.layout().clone(),
//!     config.layout().zoom_level().unwrap(),
//! );
//!
//! let state = SyncState::new("sheet atlas\n", Description::default());
//! let view = presenter.render(state);
//!
//! let svg = SvgRenderer::new(config.style()).unwrap().render(view).unwrap();
//! assert!(svg.contains("<svg"));
//! ```
//!
//! [`SyncState`]: orchestrator::SyncState

pub mod config;
pub mod diagnostics_channel;
pub mod export;
pub mod host;
pub mod layout;
pub mod message;
pub mod orchestrator;
pub mod presenter;
pub mod scheduler;
pub mod session;
pub mod tool;

mod error;

pub use error::PreviewError;

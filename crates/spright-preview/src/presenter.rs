//! The preview side: turns sync states into views.
//!
//! A [`Presenter`] receives the state of each completed refresh cycle,
//! parses its configuration text and lays out its description. Zooming
//! re-arranges the current layout without touching the state. Edits the
//! preview wants to make to the document leave it as [`FromPreview`]
//! messages.

use log::{debug, warn};

use spright_core::{
    config_model::ConfigModel,
    zoom::{ZoomDirection, ZoomLevel},
};

use crate::{
    config::LayoutConfig,
    layout::{LayoutTree, layout},
    message::{FromPreview, ToPreview},
    orchestrator::SyncState,
};

/// Message shown when the configuration text cannot be parsed.
pub const CONFIG_PARSE_FAILED: &str = "Parsing configuration failed";

/// What the preview displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    /// Nothing was rendered yet.
    #[default]
    Empty,
    /// A placeholder with an error message.
    Error(String),
    /// A laid-out description.
    Layout(LayoutTree),
}

impl View {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the layout tree, if the view shows one.
    pub fn layout(&self) -> Option<&LayoutTree> {
        match self {
            Self::Layout(tree) => Some(tree),
            _ => None,
        }
    }
}

/// Renders sync states and tracks the zoom level.
#[derive(Debug, Clone)]
pub struct Presenter {
    layout_config: LayoutConfig,
    zoom: ZoomLevel,
    state: Option<SyncState>,
    model: Option<ConfigModel>,
    view: View,
}

impl Presenter {
    /// Creates a presenter showing an empty view at `zoom`.
    pub fn new(layout_config: LayoutConfig, zoom: ZoomLevel) -> Self {
        Self {
            layout_config,
            zoom,
            state: None,
            model: None,
            view: View::Empty,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom
    }

    /// Returns the last rendered state.
    pub fn state(&self) -> Option<&SyncState> {
        self.state.as_ref()
    }

    /// Handles a message from the document side.
    pub fn on_message(&mut self, message: ToPreview) -> &View {
        match message {
            ToPreview::SetConfig {
                config,
                description,
            } => self.render(SyncState::new(config, description)),
        }
    }

    /// Replaces the displayed state and rebuilds the view.
    ///
    /// The same state always produces the same view. A configuration that
    /// does not parse produces the error placeholder, never a partial
    /// layout.
    pub fn render(&mut self, state: SyncState) -> &View {
        match ConfigModel::parse(state.config()) {
            Ok(model) => {
                self.view = View::Layout(layout(
                    state.description(),
                    self.zoom,
                    &self.layout_config,
                ));
                self.model = Some(model);
            }
            Err(err) => {
                warn!(err:err; "Configuration text did not parse");
                self.view = View::Error(CONFIG_PARSE_FAILED.to_string());
                self.model = None;
            }
        }
        self.state = Some(state);
        &self.view
    }

    /// Steps the zoom level and re-arranges the current layout.
    pub fn zoom(&mut self, direction: ZoomDirection) -> &View {
        let zoom = self.zoom.step(direction);
        if zoom != self.zoom {
            self.zoom = zoom;
            if let View::Layout(tree) = &mut self.view {
                tree.apply_zoom(zoom);
            }
        }
        debug!(zoom = self.zoom.factor(); "Zoom changed");
        &self.view
    }

    /// Returns the configuration text in normalized form.
    ///
    /// Returns `None` if no state was rendered or its configuration did not
    /// parse.
    pub fn normalized_config(&self) -> Option<String> {
        self.model.as_ref().map(ConfigModel::to_string)
    }

    /// Builds a request to replace the document with `text`.
    pub fn request_update(&self, text: impl Into<String>) -> FromPreview {
        FromPreview::UpdateConfig { text: text.into() }
    }

    /// Builds a request to replace the document with its normalized form.
    pub fn request_normalize(&self) -> Option<FromPreview> {
        self.normalized_config().map(|text| self.request_update(text))
    }

    /// Builds a request for a debug tool run on the current configuration.
    pub fn request_debug_run(&self) -> Option<FromPreview> {
        self.normalized_config()
            .map(|text| FromPreview::ExecSpright { text })
    }
}

//! Configuration types for the Spright preview.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field has a default, so an empty file is a valid
//! configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ToolConfig`] - Which `spright` binary is invoked.
//! - [`SchedulerConfig`] - Timing of refresh cycles.
//! - [`LayoutConfig`] - Spacing, label size and initial zoom of the preview.
//! - [`StyleConfig`] - Colors of the rendered preview.
//!
//! # Example
//!
//! ```
//! # use spright_preview::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.scheduler().settle_delay().as_millis(), 100);
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use spright_core::{color::Color, zoom::ZoomLevel};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    tool: ToolConfig,

    #[serde(default)]
    scheduler: SchedulerConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        tool: ToolConfig,
        scheduler: SchedulerConfig,
        layout: LayoutConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            tool,
            scheduler,
            layout,
            style,
        }
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    pub fn scheduler(&self) -> &SchedulerConfig {
        &self.scheduler
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the tool binary path.
    pub fn set_tool_path(&mut self, path: impl Into<PathBuf>) {
        self.tool.path = path.into();
    }

    /// Replaces the initial zoom factor.
    pub fn set_default_zoom(&mut self, factor: f32) {
        self.layout.default_zoom = factor;
    }

    /// Checks the values that deserialization cannot check.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid value: an unknown zoom
    /// factor, a negative spacing, or a color that cannot be parsed.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.zoom_level()?;
        if self.layout.padding < 0.0 || self.layout.spacing < 0.0 {
            return Err("Layout padding and spacing must not be negative".to_string());
        }
        if self.layout.label_font_size <= 0.0 {
            return Err("Label font size must be positive".to_string());
        }
        self.style.frame_color()?;
        self.style.sprite_color()?;
        self.style.pivot_color()?;
        self.style.text_color()?;
        Ok(())
    }
}

/// Selects the `spright` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Binary path, resolved through `PATH` when it has no directory part.
    #[serde(default = "default_tool_path")]
    path: PathBuf,
}

impl ToolConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            path: default_tool_path(),
        }
    }
}

fn default_tool_path() -> PathBuf {
    PathBuf::from("spright")
}

/// Timing of refresh cycles.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Milliseconds to wait before reading the document for a cycle.
    #[serde(default = "default_settle_delay_ms")]
    settle_delay_ms: u64,
}

impl SchedulerConfig {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay_ms: u64::try_from(settle_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the delay that absorbs bursts of edits.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    100
}

/// Arrangement of the preview blocks.
///
/// Distances are in output units and are not scaled by zoom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Space around the whole preview.
    #[serde(default = "default_padding")]
    padding: f32,

    /// Space between neighbouring blocks and between a label and its block.
    #[serde(default = "default_spacing")]
    spacing: f32,

    /// Font size of filename and sprite labels.
    #[serde(default = "default_label_font_size")]
    label_font_size: f32,

    /// Zoom factor a preview opens with.
    #[serde(default = "default_zoom")]
    default_zoom: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `padding` - Space around the whole preview.
    /// * `spacing` - Space between blocks.
    /// * `label_font_size` - Font size of labels.
    /// * `default_zoom` - Initial zoom factor; must be one of the zoom levels.
    pub fn new(padding: f32, spacing: f32, label_font_size: f32, default_zoom: f32) -> Self {
        Self {
            padding,
            spacing,
            label_font_size,
            default_zoom,
        }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn label_font_size(&self) -> f32 {
        self.label_font_size
    }

    /// Returns the configured initial [`ZoomLevel`].
    ///
    /// # Errors
    ///
    /// Returns an error if `default_zoom` is not one of the zoom levels.
    pub fn zoom_level(&self) -> Result<ZoomLevel, String> {
        ZoomLevel::from_factor(self.default_zoom)
            .ok_or_else(|| format!("Invalid default zoom in config: {}", self.default_zoom))
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            spacing: default_spacing(),
            label_font_size: default_label_font_size(),
            default_zoom: default_zoom(),
        }
    }
}

fn default_padding() -> f32 {
    8.0
}

fn default_spacing() -> f32 {
    16.0
}

fn default_label_font_size() -> f32 {
    12.0
}

fn default_zoom() -> f32 {
    ZoomLevel::default().factor()
}

/// Colors of the rendered preview, as CSS color strings.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_frame_color")]
    frame_color: String,

    #[serde(default = "default_sprite_color")]
    sprite_color: String,

    #[serde(default = "default_pivot_color")]
    pivot_color: String,

    #[serde(default = "default_text_color")]
    text_color: String,
}

impl StyleConfig {
    /// Returns the color of the frame around each source canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn frame_color(&self) -> Result<Color, String> {
        parse_color("frame", &self.frame_color)
    }

    /// Returns the outline color of sprite boxes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn sprite_color(&self) -> Result<Color, String> {
        parse_color("sprite", &self.sprite_color)
    }

    /// Returns the color of pivot markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn pivot_color(&self) -> Result<Color, String> {
        parse_color("pivot", &self.pivot_color)
    }

    /// Returns the color of labels and messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn text_color(&self) -> Result<Color, String> {
        parse_color("text", &self.text_color)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            frame_color: default_frame_color(),
            sprite_color: default_sprite_color(),
            pivot_color: default_pivot_color(),
            text_color: default_text_color(),
        }
    }
}

fn parse_color(name: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {name} color in config: {err}"))
}

fn default_frame_color() -> String {
    "gray".to_string()
}

fn default_sprite_color() -> String {
    "#00a0ff".to_string()
}

fn default_pivot_color() -> String {
    "red".to_string()
}

fn default_text_color() -> String {
    "black".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tool().path(), Path::new("spright"));
        assert_eq!(config.scheduler().settle_delay(), Duration::from_millis(100));
        assert_eq!(config.layout(), &LayoutConfig::default());
        assert_eq!(config.layout().zoom_level().unwrap().factor(), 2.0);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [tool]
            path = "/opt/spright/bin/spright"

            [scheduler]
            settle_delay_ms = 250

            [layout]
            spacing = 4.0
            default_zoom = 8.0

            [style]
            sprite_color = "lime"
            "#,
        )
        .unwrap();

        assert_eq!(config.tool().path(), Path::new("/opt/spright/bin/spright"));
        assert_eq!(config.scheduler().settle_delay(), Duration::from_millis(250));
        assert_eq!(config.layout().spacing(), 4.0);
        assert_eq!(config.layout().padding(), 8.0);
        assert_eq!(config.layout().zoom_level().unwrap().factor(), 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_zoom() {
        let config: AppConfig = toml::from_str("[layout]\ndefault_zoom = 7.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("default zoom"));
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let config: AppConfig = toml::from_str("[style]\npivot_color = \"not-a-color\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("pivot color"));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.set_tool_path("./bin/spright");
        config.set_default_zoom(0.5);
        assert_eq!(config.tool().path(), Path::new("./bin/spright"));
        assert_eq!(config.layout().zoom_level().unwrap().factor(), 0.5);
    }
}

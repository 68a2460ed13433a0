//! SVG drawing target.

use log::debug;
use svg::{Document, node::element as svg_element};

use spright_core::{
    color::Color,
    draw::{LayeredOutput, RenderLayer, SvgNode},
    geometry::{Bounds, Point},
};

use super::{ExportError, Renderer};
use crate::{
    config::StyleConfig,
    layout::{Canvas, Label, LayoutTree, SpriteBox},
    presenter::View,
};

/// Radius of a pivot marker.
const PIVOT_RADIUS: f32 = 2.0;

/// Font size and margin of the error placeholder.
const MESSAGE_FONT_SIZE: f32 = 14.0;
const MESSAGE_MARGIN: f32 = 8.0;

/// Opacity of the fill inside sprite boxes.
const SPRITE_FILL_OPACITY: f32 = 0.15;

/// Draws views as SVG documents.
///
/// Layers are stacked bottom to top: source images, canvas frames, sprite
/// boxes, pivot markers and text.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    frame_color: Color,
    sprite_color: Color,
    pivot_color: Color,
    text_color: Color,
}

impl SvgRenderer {
    /// Creates a renderer with the colors of `style`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Render`] if a configured color is invalid.
    pub fn new(style: &StyleConfig) -> Result<Self, ExportError> {
        Ok(Self {
            frame_color: style.frame_color().map_err(ExportError::Render)?,
            sprite_color: style.sprite_color().map_err(ExportError::Render)?,
            pivot_color: style.pivot_color().map_err(ExportError::Render)?,
            text_color: style.text_color().map_err(ExportError::Render)?,
        })
    }

    fn document(width: f32, height: f32) -> Document {
        Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
    }

    fn render_message(&self, message: &str) -> Document {
        let width = message.chars().count() as f32 * MESSAGE_FONT_SIZE * 0.6 + 2.0 * MESSAGE_MARGIN;
        let height = MESSAGE_FONT_SIZE + 2.0 * MESSAGE_MARGIN;

        let text = svg_element::Text::new(message)
            .set("class", "error")
            .set("x", MESSAGE_MARGIN)
            .set("y", MESSAGE_MARGIN)
            .set("dominant-baseline", "hanging")
            .set("font-family", "monospace")
            .set("font-size", MESSAGE_FONT_SIZE)
            .set("fill", &self.text_color);

        Self::document(width, height).add(text)
    }

    fn render_layout(&self, tree: &LayoutTree) -> Result<Document, ExportError> {
        let size = tree.size();
        if !size.width().is_finite() || !size.height().is_finite() {
            return Err(ExportError::Render(format!(
                "layout size is not finite: {}x{}",
                size.width(),
                size.height()
            )));
        }

        let mut output = LayeredOutput::new();
        for input in tree.inputs() {
            output.add_to_layer(RenderLayer::Text, self.render_label(input.label()));

            for source in input.sources() {
                if let Some(label) = source.label() {
                    output.add_to_layer(RenderLayer::Text, self.render_label(label));
                }
                output.merge(self.render_canvas(source.canvas()));
            }
        }

        debug!(
            width = size.width(),
            height = size.height(),
            sprites = tree.sprite_count();
            "Rendering preview SVG"
        );

        let mut document = Self::document(size.width(), size.height());
        for node in output.render() {
            document = document.add(node);
        }
        Ok(document)
    }

    fn render_canvas(&self, canvas: &Canvas) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = canvas.bounds();

        if let Some(uri) = canvas.image_uri() {
            let image = with_bounds(svg_element::Image::new(), bounds)
                .set("href", uri)
                .set("preserveAspectRatio", "none")
                .set("style", "image-rendering: pixelated");
            output.add_to_layer(RenderLayer::Image, Box::new(image));
        }

        let frame = with_bounds(svg_element::Rectangle::new(), bounds)
            .set("fill", "none")
            .set("stroke", &self.frame_color)
            .set("stroke-width", 1);
        output.add_to_layer(RenderLayer::Frame, Box::new(frame));

        for sprite in canvas.sprites() {
            output.merge(self.render_sprite(sprite));
        }
        output
    }

    fn render_sprite(&self, sprite: &SpriteBox) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let rect = with_bounds(svg_element::Rectangle::new(), sprite.bounds())
            .set("data-sprite", sprite.sprite_index())
            .set("fill", &self.sprite_color)
            .set("fill-opacity", SPRITE_FILL_OPACITY)
            .set("stroke", &self.sprite_color)
            .set("stroke-width", 1)
            .set("data-id", sprite.id());
        output.add_to_layer(RenderLayer::Sprite, Box::new(rect));

        let pivot = pivot_marker(sprite.pivot_position()).set("fill", &self.pivot_color);
        output.add_to_layer(RenderLayer::Pivot, Box::new(pivot));

        output.add_to_layer(RenderLayer::Text, self.render_label(sprite.label()));
        output
    }

    fn render_label(&self, label: &Label) -> SvgNode {
        let top_left = label.bounds().min_point();
        let text = svg_element::Text::new(label.text())
            .set("x", top_left.x())
            .set("y", top_left.y())
            .set("dominant-baseline", "hanging")
            .set("font-family", "monospace")
            .set("font-size", label.font_size())
            .set("fill", &self.text_color);
        Box::new(text)
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, view: &View) -> Result<String, ExportError> {
        let document = match view {
            View::Empty => Self::document(0.0, 0.0),
            View::Error(message) => self.render_message(message),
            View::Layout(tree) => self.render_layout(tree)?,
        };
        Ok(document.to_string())
    }
}

fn with_bounds<T: svg::Node>(element: T, bounds: Bounds) -> T {
    let mut element = element;
    element.assign("x", bounds.min_x());
    element.assign("y", bounds.min_y());
    element.assign("width", bounds.width());
    element.assign("height", bounds.height());
    element
}

fn pivot_marker(position: Point) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", position.x())
        .set("cy", position.y())
        .set("r", PIVOT_RADIUS)
}

#[cfg(test)]
mod tests {
    use spright_core::{description::Description, zoom::ZoomLevel};

    use super::*;
    use crate::{config::LayoutConfig, layout::layout};

    fn renderer() -> SvgRenderer {
        SvgRenderer::new(&StyleConfig::default()).unwrap()
    }

    fn tree() -> LayoutTree {
        let json = r#"{
            "inputs": [{"filename": "hero.png", "sourceIndices": [0]}],
            "sources": [{"index": 0, "filename": "hero.png", "width": 16, "height": 16, "spriteIndices": [0]}],
            "sprites": [{"id": "hero", "index": 0, "sourceIndex": 0,
                         "trimmedSourceRect": {"x": 0, "y": 0, "w": 16, "h": 16}, "pivot": {"x": 8, "y": 16}}]
        }"#;
        let mut description = Description::from_json(json).unwrap();
        description.sources_mut()[0].set_uri("file:///work/hero.png");
        layout(&description, ZoomLevel::default(), &LayoutConfig::default())
    }

    #[test]
    fn test_error_view_is_single_text() {
        let svg = renderer().render(&View::Error("Parsing configuration failed".into())).unwrap();
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(svg.contains("Parsing configuration failed"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_layout_layers_are_ordered() {
        let svg = renderer().render(&View::Layout(tree())).unwrap();

        let image = svg.find("data-layer=\"image\"").unwrap();
        let frame = svg.find("data-layer=\"frame\"").unwrap();
        let sprite = svg.find("data-layer=\"sprite\"").unwrap();
        let pivot = svg.find("data-layer=\"pivot\"").unwrap();
        let text = svg.find("data-layer=\"text\"").unwrap();
        assert!(image < frame && frame < sprite && sprite < pivot && pivot < text);

        assert!(svg.contains("file:///work/hero.png"));
        assert!(svg.contains("data-id=\"hero\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        let view = View::Layout(tree());
        assert_eq!(renderer().render(&view).unwrap(), renderer().render(&view).unwrap());
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let style: StyleConfig = toml::from_str("text_color = \"nope\"").unwrap();
        assert!(matches!(SvgRenderer::new(&style), Err(ExportError::Render(_))));
    }

    #[test]
    fn test_empty_view() {
        let svg = renderer().render(&View::Empty).unwrap();
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<g"));
    }
}

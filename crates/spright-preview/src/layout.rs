//! Layout of a [`Description`] into a positioned preview tree.
//!
//! The tree has three nested levels, mirroring the description:
//!
//! ```text
//! LayoutTree
//! └── InputBlock      filename label, then its sources left to right
//!     └── SourceBlock optional filename label above the canvas
//!         └── Canvas  source image scaled by zoom
//!             └── SpriteBox  trimmed rect, pivot marker and id label
//! ```
//!
//! Inputs are stacked vertically. Labels keep their size at every zoom
//! level and are measured with a fixed advance per character, so a layout
//! does not depend on the fonts installed where it is computed.
//!
//! Building the tree resolves every index once. [`LayoutTree::apply_zoom`]
//! only repositions the blocks that already exist.

use log::{debug, warn};

use spright_core::{
    description::{Description, Rect, Source},
    geometry::{Bounds, Insets, Point, Size},
    zoom::ZoomLevel,
};

use crate::config::LayoutConfig;

/// Horizontal advance of one label character, relative to the font size.
const CHAR_ADVANCE: f32 = 0.6;

/// Height of a label line, relative to the font size.
const LINE_HEIGHT: f32 = 1.2;

/// A line of text with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    font_size: f32,
    bounds: Bounds,
}

impl Label {
    fn new(text: impl Into<String>, font_size: f32) -> Self {
        let text = text.into();
        let size = estimate_text_size(&text, font_size);
        Self {
            text,
            font_size,
            bounds: Bounds::from_origin(Point::default(), size),
        }
    }

    fn place(&mut self, top_left: Point) {
        self.bounds = Bounds::from_origin(top_left, self.size());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size(&self) -> Size {
        self.bounds.to_size()
    }
}

/// Estimates the size of a single line of `text`.
fn estimate_text_size(text: &str, font_size: f32) -> Size {
    let chars = text.chars().count() as f32;
    Size::new(chars * font_size * CHAR_ADVANCE, font_size * LINE_HEIGHT)
}

/// A sprite drawn on its source canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteBox {
    sprite_index: usize,
    rect: Rect,
    pivot: Point,
    label: Label,
    bounds: Bounds,
    pivot_position: Point,
}

impl SpriteBox {
    /// Returns the index of the sprite in the description.
    pub fn sprite_index(&self) -> usize {
        self.sprite_index
    }

    pub fn id(&self) -> &str {
        self.label.text()
    }

    /// Returns the trimmed rect in source image pixels.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns the zoomed box in preview coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the zoomed pivot in preview coordinates.
    pub fn pivot_position(&self) -> Point {
        self.pivot_position
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    fn arrange(&mut self, canvas_origin: Point, factor: f32) {
        self.bounds = self.rect.to_bounds().scale(factor).translate(canvas_origin);
        self.pivot_position = self.pivot.scale(factor).offset(canvas_origin);
        self.label.place(self.bounds.min_point());
    }
}

/// The zoomed image of one source with its sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image_size: Size,
    image_uri: Option<String>,
    sprites: Vec<SpriteBox>,
    bounds: Bounds,
}

impl Canvas {
    /// Returns the size of the source image in pixels.
    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn image_uri(&self) -> Option<&str> {
        self.image_uri.as_deref()
    }

    pub fn sprites(&self) -> &[SpriteBox] {
        &self.sprites
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn arrange(&mut self, top_left: Point, factor: f32) -> Size {
        let size = self.image_size.scale(factor);
        self.bounds = Bounds::from_origin(top_left, size);
        for sprite in &mut self.sprites {
            sprite.arrange(top_left, factor);
        }
        size
    }
}

/// One source of an input.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBlock {
    source_index: usize,
    label: Option<Label>,
    canvas: Canvas,
    bounds: Bounds,
}

impl SourceBlock {
    /// Returns the index of the source in the description.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Returns the filename label, present when it differs from the input's.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn arrange(&mut self, top_left: Point, factor: f32, spacing: f32) -> Size {
        let mut canvas_top = top_left;
        let mut size = Size::default();
        if let Some(label) = &mut self.label {
            label.place(top_left);
            size = label.size();
            canvas_top = Point::new(top_left.x(), top_left.y() + size.height() + spacing);
            size = size.merge_vertical(Size::new(0.0, spacing));
        }

        size = size.merge_vertical(self.canvas.arrange(canvas_top, factor));
        self.bounds = Bounds::from_origin(top_left, size);
        size
    }
}

/// One input with its filename and sources.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBlock {
    label: Label,
    sources: Vec<SourceBlock>,
    bounds: Bounds,
}

impl InputBlock {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn sources(&self) -> &[SourceBlock] {
        &self.sources
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn arrange(&mut self, top_left: Point, factor: f32, spacing: f32) -> Size {
        self.label.place(top_left);
        let label_size = self.label.size();
        let row_y = top_left.y() + label_size.height() + spacing;

        let mut x = top_left.x();
        let mut row = Size::default();
        for (i, source) in self.sources.iter_mut().enumerate() {
            if i > 0 {
                x += spacing;
            }
            let size = source.arrange(Point::new(x, row_y), factor, spacing);
            x += size.width();
            row = Size::new(x - top_left.x(), row.height().max(size.height()));
        }

        let size = if self.sources.is_empty() {
            label_size
        } else {
            label_size
                .merge_vertical(Size::new(0.0, spacing))
                .merge_vertical(row)
        };
        self.bounds = Bounds::from_origin(top_left, size);
        size
    }
}

/// A positioned preview of a description at one zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    zoom: ZoomLevel,
    config: LayoutConfig,
    inputs: Vec<InputBlock>,
    size: Size,
}

impl LayoutTree {
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn inputs(&self) -> &[InputBlock] {
        &self.inputs
    }

    /// Returns the size of the whole preview, padding included.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the number of sprite boxes in the tree.
    pub fn sprite_count(&self) -> usize {
        self.inputs
            .iter()
            .flat_map(|input| &input.sources)
            .map(|source| source.canvas.sprites.len())
            .sum()
    }

    /// Repositions the tree for another zoom level.
    pub fn apply_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
        self.arrange();
    }

    fn arrange(&mut self) {
        let padding = self.config.padding();
        let spacing = self.config.spacing();
        let factor = self.zoom.factor();

        let mut y = padding;
        let mut content = Size::default();
        for (i, input) in self.inputs.iter_mut().enumerate() {
            if i > 0 {
                y += spacing;
                content = content.merge_vertical(Size::new(0.0, spacing));
            }
            let size = input.arrange(Point::new(padding, y), factor, spacing);
            y += size.height();
            content = content.merge_vertical(size);
        }

        self.size = content.add_padding(Insets::uniform(padding));
    }
}

/// Lays out `description` at `zoom`.
///
/// Indices that do not resolve are skipped with a warning, so a layout can
/// be computed even for a description that failed validation.
///
/// # Arguments
///
/// * `description` - The description to lay out.
/// * `zoom` - The initial zoom level.
/// * `config` - Spacing and label settings.
///
/// # Examples
///
/// ```
/// # use spright_core::{description::Description, zoom::ZoomLevel};
/// # use spright_preview::{config::LayoutConfig, layout::layout};
/// let tree = layout(&Description::default(), ZoomLevel::default(), &LayoutConfig::default());
/// assert!(tree.inputs().is_empty());
/// ```
pub fn layout(description: &Description, zoom: ZoomLevel, config: &LayoutConfig) -> LayoutTree {
    let font_size = config.label_font_size();

    let inputs = description
        .inputs()
        .iter()
        .enumerate()
        .map(|(input_index, input)| {
            let sources = input
                .source_indices()
                .iter()
                .filter_map(|&index| {
                    let source = description.source(index);
                    if source.is_none() {
                        warn!(input = input_index, source = index; "Skipping unknown source");
                    }
                    source.map(|source| (index, source))
                })
                .map(|(index, source)| SourceBlock {
                    source_index: index,
                    label: (source.filename() != input.filename())
                        .then(|| Label::new(source.filename(), font_size)),
                    canvas: build_canvas(description, index, source, font_size),
                    bounds: Bounds::default(),
                })
                .collect();

            InputBlock {
                label: Label::new(input.filename(), font_size),
                sources,
                bounds: Bounds::default(),
            }
        })
        .collect();

    let mut tree = LayoutTree {
        zoom,
        config: config.clone(),
        inputs,
        size: Size::default(),
    };
    tree.arrange();

    debug!(
        inputs = tree.inputs.len(),
        sprites = tree.sprite_count(),
        zoom = tree.zoom.factor();
        "Laid out description"
    );
    tree
}

fn build_canvas(description: &Description, source_index: usize, source: &Source, font_size: f32) -> Canvas {
    let sprites = source
        .sprite_indices()
        .iter()
        .filter_map(|&index| {
            let sprite = description.sprite(index);
            if sprite.is_none() {
                warn!(source = source_index, sprite = index; "Skipping unknown sprite");
            }
            sprite.map(|sprite| (index, sprite))
        })
        .map(|(index, sprite)| {
            let rect = sprite.trimmed_source_rect();
            SpriteBox {
                sprite_index: index,
                rect,
                pivot: rect.origin().offset(sprite.pivot().to_point()),
                label: Label::new(sprite.id(), font_size),
                bounds: Bounds::default(),
                pivot_position: Point::default(),
            }
        })
        .collect();

    Canvas {
        image_size: source.size(),
        image_uri: source.uri().map(str::to_string),
        sprites,
        bounds: Bounds::default(),
    }
}

//! Z-ordered SVG output.
//!
//! Drawing code tags every element with the [`RenderLayer`] it belongs to,
//! so a preview can be drawn in one pass over its layout and still stack
//! source images below sprite boxes, and sprite boxes below their labels.
//!
//! # Example
//!
//! ```
//! # use spright_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Image, Text};
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(RenderLayer::Text, Box::new(Text::new("hero_idle")));
//! output.add_to_layer(RenderLayer::Image, Box::new(Image::new()));
//!
//! // One group per layer, the image group first
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use std::collections::BTreeMap;

use svg::node::element::Group;

/// A boxed SVG node.
pub type SvgNode = Box<dyn svg::Node>;

/// Drawing layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Source images
    Image,
    /// Canvas frames around each source
    Frame,
    /// Sprite boxes at their trimmed rects
    Sprite,
    Pivot,
    /// Labels and messages
    Text,
}

impl RenderLayer {
    /// Returns the value of the group's `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Frame => "frame",
            Self::Sprite => "sprite",
            Self::Pivot => "pivot",
            Self::Text => "text",
        }
    }
}

/// SVG nodes collected per layer.
///
/// Within a layer, nodes keep the order they were added in.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    layers: BTreeMap<RenderLayer, Vec<SvgNode>>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.layers.entry(layer).or_default().push(node);
    }

    /// Appends every node of `other` after the nodes already in its layer.
    pub fn merge(&mut self, other: LayeredOutput) {
        for (layer, nodes) in other.layers {
            self.layers.entry(layer).or_default().extend(nodes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Emits one `<g data-layer="...">` per non-empty layer, bottom layer first.
    pub fn render(self) -> Vec<SvgNode> {
        self.layers
            .into_iter()
            .map(|(layer, nodes)| {
                let group = nodes
                    .into_iter()
                    .fold(Group::new().set("data-layer", layer.name()), |group, node| {
                        group.add(node)
                    });
                Box::new(group) as SvgNode
            })
            .collect()
    }
}

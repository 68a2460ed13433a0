//! Drawing primitives shared by preview renderers.

mod layer;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};

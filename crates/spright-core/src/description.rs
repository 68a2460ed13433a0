//! The sprite sheet description reported by `spright describe`.
//!
//! A [`Description`] is a read-only snapshot of the render geometry of a
//! configuration. It is organized as three ordered sequences which reference
//! each other by 0-based index:
//!
//! ```text
//! inputs[i].sourceIndices ──► sources[j].spriteIndices ──► sprites[k]
//!                                   ▲                          │
//!                                   └──── sprites[k].sourceIndex
//! ```
//!
//! The tool is untrusted input, so [`Description::from_json`] checks every
//! cross-reference before a description is handed to the layout. The `uri`
//! of a [`Source`] is never read from tool output; it is derived from the
//! document location by the caller through [`Source::set_uri`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::geometry::{Bounds, Point, Size};

/// Errors produced while reading a description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("invalid description JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input {input} references source {index}, but there are {len} sources")]
    DanglingSource {
        input: usize,
        index: usize,
        len: usize,
    },

    #[error("source {source_index} references sprite {index}, but there are {len} sprites")]
    DanglingSprite {
        source_index: usize,
        index: usize,
        len: usize,
    },

    #[error("sprite {sprite} belongs to source {index}, but there are {len} sources")]
    DanglingSpriteSource {
        sprite: usize,
        index: usize,
        len: usize,
    },
}

/// A rectangle in source image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the top-left corner of the rectangle.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the width and height of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Converts the rectangle to [`Bounds`].
    pub fn to_bounds(&self) -> Bounds {
        Bounds::from_origin(self.origin(), self.size())
    }
}

/// A point in source image pixels, used for pivots and vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    x: f32,
    y: f32,
}

impl Coord {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts the coordinate to a geometry [`Point`].
    pub fn to_point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One input of the configuration and the sources it expanded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    filename: String,
    #[serde(default)]
    source_indices: Vec<usize>,
}

impl Input {
    /// Returns the filename pattern of the input as written in the configuration.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the indices of the sources of this input.
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }
}

/// A source image and the sprites cut from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    index: usize,
    filename: String,
    #[serde(default)]
    path: String,
    width: f32,
    height: f32,
    #[serde(default)]
    sprite_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
}

impl Source {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the directory of the source, relative to the configuration.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the size of the source image in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the indices of the sprites cut from this source.
    pub fn sprite_indices(&self) -> &[usize] {
        &self.sprite_indices
    }

    /// Returns the displayable location of the source image, once resolved.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Sets the displayable location of the source image.
    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = Some(uri.into());
    }
}

/// A single sprite of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprite {
    id: String,
    index: usize,
    #[serde(default)]
    input_sprite_index: usize,
    #[serde(default)]
    pivot: Coord,
    #[serde(default)]
    rect: Rect,
    #[serde(default)]
    trimmed_rect: Rect,
    #[serde(default)]
    rotated: bool,
    source_index: usize,
    #[serde(default)]
    source_rect: Rect,
    trimmed_source_rect: Rect,
    #[serde(default)]
    slice_index: usize,
    #[serde(default)]
    slice_sprite_index: usize,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    tags: Value,
    #[serde(default)]
    vertices: Vec<Coord>,
}

impl Sprite {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn input_sprite_index(&self) -> usize {
        self.input_sprite_index
    }

    /// Returns the pivot, relative to the origin of the trimmed rect.
    pub fn pivot(&self) -> Coord {
        self.pivot
    }

    /// Returns the rect of the sprite on the output sheet.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns the trimmed rect of the sprite on the output sheet.
    pub fn trimmed_rect(&self) -> Rect {
        self.trimmed_rect
    }

    pub fn rotated(&self) -> bool {
        self.rotated
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Returns the rect of the sprite within its source image.
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// Returns the trimmed rect of the sprite within its source image.
    pub fn trimmed_source_rect(&self) -> Rect {
        self.trimmed_source_rect
    }

    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    pub fn slice_sprite_index(&self) -> usize {
        self.slice_sprite_index
    }

    /// Returns the user data attached to the sprite in the configuration.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn tags(&self) -> &Value {
        &self.tags
    }

    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }
}

/// The complete description of a sprite sheet configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    inputs: Vec<Input>,
    sources: Vec<Source>,
    sprites: Vec<Sprite>,
}

impl Description {
    /// Parses and validates a description from the JSON printed by the tool.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Json`] when the text is not a description
    /// document, or one of the dangling-index variants when a cross-reference
    /// points outside its sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spright_core::description::Description;
    /// let json = r#"{"inputs": [], "sources": [], "sprites": []}"#;
    /// let description = Description::from_json(json).unwrap();
    /// assert!(description.inputs().is_empty());
    ///
    /// assert!(Description::from_json("not json").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, DescriptionError> {
        let mut description: Description = serde_json::from_str(json)?;
        for source in &mut description.sources {
            source.uri = None;
        }
        description.validate()?;
        Ok(description)
    }

    /// Checks that every cross-reference resolves within its sequence.
    ///
    /// # Errors
    ///
    /// Returns the first dangling reference found, scanning inputs, then
    /// sources, then sprites.
    pub fn validate(&self) -> Result<(), DescriptionError> {
        for (input, entry) in self.inputs.iter().enumerate() {
            if let Some(&index) = entry
                .source_indices
                .iter()
                .find(|&&index| index >= self.sources.len())
            {
                return Err(DescriptionError::DanglingSource {
                    input,
                    index,
                    len: self.sources.len(),
                });
            }
        }

        for (source_index, source) in self.sources.iter().enumerate() {
            if let Some(&index) = source
                .sprite_indices
                .iter()
                .find(|&&index| index >= self.sprites.len())
            {
                return Err(DescriptionError::DanglingSprite {
                    source_index,
                    index,
                    len: self.sprites.len(),
                });
            }
        }

        for (sprite, entry) in self.sprites.iter().enumerate() {
            if entry.source_index >= self.sources.len() {
                return Err(DescriptionError::DanglingSpriteSource {
                    sprite,
                    index: entry.source_index,
                    len: self.sources.len(),
                });
            }
        }

        Ok(())
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Returns the sources mutably, to attach derived URIs.
    pub fn sources_mut(&mut self) -> &mut [Source] {
        &mut self.sources
    }

    /// Returns the source at `index`, if it exists.
    pub fn source(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// Returns the sprite at `index`, if it exists.
    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn sample_json() -> String {
        json!({
            "inputs": [
                { "filename": "hero.png", "sourceIndices": [0] }
            ],
            "sources": [
                {
                    "index": 0, "filename": "hero.png", "path": "assets",
                    "width": 64, "height": 32, "spriteIndices": [0, 1]
                }
            ],
            "sprites": [
                {
                    "id": "hero_idle", "index": 0, "sourceIndex": 0,
                    "pivot": { "x": 8, "y": 16 },
                    "trimmedSourceRect": { "x": 0, "y": 0, "w": 16, "h": 32 },
                    "rotated": false,
                    "vertices": [{ "x": 0, "y": 0 }],
                    "tags": { "kind": "idle" }
                },
                {
                    "id": "hero_walk", "index": 1, "sourceIndex": 0,
                    "pivot": { "x": 8, "y": 16 },
                    "trimmedSourceRect": { "x": 16, "y": 0, "w": 16, "h": 32 }
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_from_json_reads_camel_case_fields() {
        let description = Description::from_json(&sample_json()).unwrap();

        assert_eq!(description.inputs().len(), 1);
        assert_eq!(description.inputs()[0].source_indices(), &[0]);

        let source = &description.sources()[0];
        assert_eq!(source.path(), "assets");
        assert_eq!(source.sprite_indices(), &[0, 1]);
        assert_approx_eq!(f32, source.size().width(), 64.0);
        assert!(source.uri().is_none());

        let sprite = &description.sprites()[1];
        assert_eq!(sprite.id(), "hero_walk");
        assert_approx_eq!(f32, sprite.trimmed_source_rect().origin().x(), 16.0);
        assert_eq!(description.sprites()[0].tags()["kind"], "idle");
    }

    #[test]
    fn test_uri_is_never_read_from_tool_output() {
        let json = json!({
            "inputs": [],
            "sources": [{
                "index": 0, "filename": "a.png", "width": 1, "height": 1,
                "uri": "https://example.invalid/a.png"
            }],
            "sprites": []
        })
        .to_string();

        let description = Description::from_json(&json).unwrap();
        assert!(description.sources()[0].uri().is_none());
    }

    #[test]
    fn test_uri_is_serialized_once_set() {
        let mut description = Description::from_json(&sample_json()).unwrap();
        description.sources_mut()[0].set_uri("file:///tmp/assets/hero.png");

        let value = serde_json::to_value(&description).unwrap();
        assert_eq!(value["sources"][0]["uri"], "file:///tmp/assets/hero.png");
        assert_eq!(value["sources"][0]["spriteIndices"], json!([0, 1]));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Description::from_json("{\"inputs\": ["),
            Err(DescriptionError::Json(_))
        ));
        assert!(matches!(
            Description::from_json("[]"),
            Err(DescriptionError::Json(_))
        ));
    }

    #[test]
    fn test_dangling_source_index_is_rejected() {
        let json = json!({
            "inputs": [{ "filename": "a.png", "sourceIndices": [0, 3] }],
            "sources": [{ "index": 0, "filename": "a.png", "width": 1, "height": 1 }],
            "sprites": []
        })
        .to_string();

        match Description::from_json(&json) {
            Err(DescriptionError::DanglingSource { input, index, len }) => {
                assert_eq!((input, index, len), (0, 3, 1));
            }
            other => panic!("expected dangling source, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_sprite_index_is_rejected() {
        let json = json!({
            "inputs": [],
            "sources": [{
                "index": 0, "filename": "a.png", "width": 1, "height": 1,
                "spriteIndices": [1]
            }],
            "sprites": []
        })
        .to_string();

        assert!(matches!(
            Description::from_json(&json),
            Err(DescriptionError::DanglingSprite { index: 1, .. })
        ));
    }

    #[test]
    fn test_dangling_sprite_source_is_rejected() {
        let json = json!({
            "inputs": [],
            "sources": [],
            "sprites": [{
                "id": "a", "index": 0, "sourceIndex": 0,
                "trimmedSourceRect": { "x": 0, "y": 0, "w": 1, "h": 1 }
            }]
        })
        .to_string();

        assert!(matches!(
            Description::from_json(&json),
            Err(DescriptionError::DanglingSpriteSource { sprite: 0, .. })
        ));
    }

    // ===================
    // Strategies
    // ===================

    /// Index lists over a range slightly larger than the target sequence so
    /// both valid and dangling references are generated.
    fn indices_strategy(len: usize) -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0..len + 2, 0..4)
    }

    fn description_json_strategy() -> impl Strategy<Value = serde_json::Value> {
        (1usize..4, 0usize..5).prop_flat_map(|(source_count, sprite_count)| {
            (
                prop::collection::vec(indices_strategy(source_count), 0..3),
                prop::collection::vec(indices_strategy(sprite_count), source_count),
                prop::collection::vec(0..source_count + 1, sprite_count),
            )
                .prop_map(move |(inputs, sources, sprite_sources)| {
                    json!({
                        "inputs": inputs.iter().enumerate().map(|(i, indices)| json!({
                            "filename": format!("input{i}.png"),
                            "sourceIndices": indices,
                        })).collect::<Vec<_>>(),
                        "sources": sources.iter().enumerate().map(|(i, indices)| json!({
                            "index": i,
                            "filename": format!("source{i}.png"),
                            "path": "",
                            "width": 32,
                            "height": 32,
                            "spriteIndices": indices,
                        })).collect::<Vec<_>>(),
                        "sprites": sprite_sources.iter().enumerate().map(|(i, source)| json!({
                            "id": format!("sprite{i}"),
                            "index": i,
                            "sourceIndex": source,
                            "trimmedSourceRect": { "x": 0, "y": 0, "w": 8, "h": 8 },
                        })).collect::<Vec<_>>(),
                    })
                })
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Validation accepts a description exactly when every index is in bounds.
    fn check_validation_matches_bounds(value: serde_json::Value) -> Result<(), TestCaseError> {
        let source_count = value["sources"].as_array().map_or(0, Vec::len);
        let sprite_count = value["sprites"].as_array().map_or(0, Vec::len);
        let indices = |items: &serde_json::Value, key: &str| -> Vec<u64> {
            items
                .as_array()
                .into_iter()
                .flatten()
                .flat_map(|item| item[key].as_array().cloned().unwrap_or_default())
                .filter_map(|index| index.as_u64())
                .collect()
        };
        let in_bounds = indices(&value["inputs"], "sourceIndices")
            .iter()
            .all(|&i| (i as usize) < source_count)
            && indices(&value["sources"], "spriteIndices")
                .iter()
                .all(|&i| (i as usize) < sprite_count)
            && value["sprites"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|sprite| sprite["sourceIndex"].as_u64())
                .all(|i| (i as usize) < source_count);

        let result = Description::from_json(&value.to_string());
        prop_assert_eq!(result.is_ok(), in_bounds, "result: {:?}", result);

        if let Ok(description) = result {
            for input in description.inputs() {
                for &index in input.source_indices() {
                    prop_assert!(description.source(index).is_some());
                }
            }
            for source in description.sources() {
                for &index in source.sprite_indices() {
                    prop_assert!(description.sprite(index).is_some());
                }
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn validation_matches_index_bounds(value in description_json_strategy()) {
            check_validation_matches_bounds(value)?;
        }
    }
}
